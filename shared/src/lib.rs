pub mod api;
pub mod spin;
pub mod store;
pub mod validation;
pub mod wheel;

pub use spin::{
    ease_out_cubic, FixedRandom, FrameCallback, FrameHandle, FrameScheduler,
    ManualFrameScheduler, RandomSource, RenderSink, RngSource, SpinConfig, SpinController,
    SpinDriver, SpinPhase, SpinPlan, SpinStep,
};
pub use store::{
    HistoryEntry, HistorySink, MemoryHistoryStore, MemoryOptionStore, NewHistoryEntry,
    OptionSource, StoreError, HISTORY_LIMIT,
};
pub use wheel::{WheelError, WheelModel, WheelOption, WheelState, MIN_OPTIONS};
