pub(crate) mod leaderboard;
pub(crate) mod lifeline;
pub(crate) mod question;
pub(crate) mod session;
pub(crate) mod store;
