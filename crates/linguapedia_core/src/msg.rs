#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Status page finished loading; starts the chain.
    PageLoaded,
    /// The pending poll timer elapsed.
    TimerFired,
    /// The status endpoint answered with a decodable payload.
    StatusReceived(crate::StatusReport),
    /// The request failed: network error, HTTP error status, or a non-JSON body.
    StatusFailed { reason: String },
    /// The page (or session) went away.
    PageUnloaded,
}
