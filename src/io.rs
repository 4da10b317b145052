//! Collaborator traits: the output transport and the binary actuator.
//!
//! Both are implemented by the embedding application. The engine never owns
//! hardware directly; it only talks to these two seams.

/// Asynchronous output transport (UART DMA, USB CDC, a test capture, ...).
///
/// A write is started by [`write`](Transport::write) and may complete later,
/// for example from an interrupt. While it is in flight
/// [`busy`](Transport::busy) must report `true`. The engine polls the flag and
/// never starts a write, or lets a unit fill the output buffer, while it is set.
///
/// `write` receives a borrowed slice that is only valid for the call, so an
/// implementation that transmits asynchronously copies the bytes into its own
/// transmit buffer before returning.
///
/// # Examples
///
/// ```rust
/// use tickshell::io::Transport;
///
/// struct Uart {
///     pending: usize,
/// }
///
/// impl Transport for Uart {
///     type Error = ();
///
///     fn busy(&self) -> bool {
///         self.pending > 0
///     }
///
///     fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
///         // Kick off DMA here; the completion interrupt clears `pending`.
///         self.pending = bytes.len();
///         Ok(())
///     }
/// }
/// ```
pub trait Transport {
    /// Transport specific error.
    type Error;

    /// Whether a previously started write is still in flight.
    fn busy(&self) -> bool;

    /// Start writing `bytes`. Only called while [`busy`](Transport::busy) is `false`.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// A single binary output, typically a status LED.
pub trait Actuator {
    /// Drive the output on (`true`) or off (`false`).
    fn set(&mut self, on: bool);

    /// Invert the current output state.
    fn toggle(&mut self);
}

/// Actuator used on boards without an LED. Every operation is a no-op.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoActuator;

impl Actuator for NoActuator {
    fn set(&mut self, _on: bool) {}

    fn toggle(&mut self) {}
}

impl Actuator for () {
    fn set(&mut self, _on: bool) {}

    fn toggle(&mut self) {}
}

/// Transport that discards everything and is never busy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = core::convert::Infallible;

    fn busy(&self) -> bool {
        false
    }

    fn write(&mut self, _bytes: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }
}
