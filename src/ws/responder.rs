/// Seam for reply generation. Pure relative to the frame being processed:
/// completes synchronously, no I/O, no assumptions about determinism.
pub trait Responder: Send + Sync {
    fn reply(&self, message: &str) -> String;
}

/// Baseline prefix echo.
pub struct EchoResponder;

impl Responder for EchoResponder {
    fn reply(&self, message: &str) -> String {
        format!("Reply to: {}", message)
    }
}
