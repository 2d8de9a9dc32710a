mod engine;

pub use engine::{format_m_ss, SessionTimer, TimerState};
