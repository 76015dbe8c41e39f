/// Execution classes used for worker scheduling and observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// State-owning loops whose latency is visible to the user interface.
	Interactive,
	/// Remote service round trips. Completion order is not guaranteed.
	Network,
	/// Housekeeping that can be delayed freely.
	Background,
}

impl TaskClass {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Network => "network",
			Self::Background => "background",
		}
	}
}
