//! Timer sessions: duration arithmetic, the start/pause/resume/stop state
//! machine and the display ticker.

pub mod display;
pub mod duration;
pub mod ports;
pub mod service;

pub use display::TimerDisplay;
pub use service::TimerService;
