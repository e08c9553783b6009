//! エディタセッション
//!
//! バッファとカーソルの管理、および編集面への反映

pub mod deferred;
pub mod heuristic;
pub mod session;
pub mod surface;

pub use deferred::DeferredApply;
pub use heuristic::{clamp_offset, find_insertion_point};
pub use session::{EditorSessionController, SessionPhase};
pub use surface::{EditorSurface, MemorySurface, SurfaceFrame, SurfaceTransaction};
