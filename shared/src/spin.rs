use crate::wheel::{resolve_in, WheelError, WheelModel, WheelOption, MIN_OPTIONS};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::f64::consts::TAU;
use std::rc::Rc;

// Defaults for the spin animation
pub const SPIN_DURATION_MS: f64 = 5000.0;
pub const MIN_SPINS: f64 = 5.0;     // Minimum number of full rotations
pub const MAX_SPINS: f64 = 10.0;    // Maximum number of full rotations
pub const MAX_SLICE_OFFSET: f64 = 0.8;  // Largest extra fraction of a slice added past the turns

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct SpinConfig {
    pub duration_ms: f64,
    pub min_spins: f64,
    pub max_spins: f64,
    pub max_slice_offset: f64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            duration_ms: SPIN_DURATION_MS,
            min_spins: MIN_SPINS,
            max_spins: MAX_SPINS,
            max_slice_offset: MAX_SLICE_OFFSET,
        }
    }
}

// Easing function for smooth deceleration
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Source of uniformly distributed numbers in `[min, max)`.
pub trait RandomSource {
    fn uniform(&mut self, min: f64, max: f64) -> f64;
}

/// Adapts any `rand` generator.
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<rand::rngs::ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.0.gen_range(min..max)
    }
}

/// Replays a fixed sequence of values, ignoring the requested range.
/// Falls back to `min` once the sequence runs out.
#[derive(Debug, Clone, Default)]
pub struct FixedRandom {
    values: VecDeque<f64>,
}

impl FixedRandom {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl RandomSource for FixedRandom {
    fn uniform(&mut self, min: f64, _max: f64) -> f64 {
        self.values.pop_front().unwrap_or(min)
    }
}

/// Draws the wheel. Called after every rotation update and once at startup.
pub trait RenderSink {
    fn draw(&mut self, options: &[WheelOption], rotation: f64);
}

impl<F: FnMut(&[WheelOption], f64)> RenderSink for F {
    fn draw(&mut self, options: &[WheelOption], rotation: f64) {
        self(options, rotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// "Wait until next paint". Callbacks receive the frame timestamp in milliseconds.
pub trait FrameScheduler {
    fn now(&self) -> f64;
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;
    fn cancel_frame(&self, handle: FrameHandle);
}

/// Scheduler driven by hand. Frames only run when `advance` is called, which makes it
/// usable both headless and in tests.
#[derive(Default)]
pub struct ManualFrameScheduler {
    now: Cell<f64>,
    next_handle: Cell<u64>,
    queue: RefCell<Vec<(FrameHandle, FrameCallback)>>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Moves the clock forward and runs every frame requested before the call.
    /// Returns how many callbacks ran.
    pub fn advance(&self, delta_ms: f64) -> usize {
        self.now.set(self.now.get() + delta_ms);
        let frames = std::mem::take(&mut *self.queue.borrow_mut());
        let count = frames.len();
        let now = self.now.get();
        for (_, callback) in frames {
            callback(now);
        }
        count
    }

    /// Keeps advancing by `frame_ms` until nothing is queued or `max_frames` is hit.
    pub fn run_until_idle(&self, frame_ms: f64, max_frames: usize) -> usize {
        let mut frames = 0;
        while self.pending() > 0 && frames < max_frames {
            self.advance(frame_ms);
            frames += 1;
        }
        frames
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.queue.borrow_mut().push((handle, callback));
        handle
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.queue.borrow_mut().retain(|(queued, _)| *queued != handle);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    Idle,
    Spinning,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub started_at: f64,
    pub start_rotation: f64,
    pub target_rotation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpinStep {
    Idle,
    Running(f64),
    Finished(WheelOption),
}

#[derive(Debug, Clone)]
struct ActiveSpin {
    plan: SpinPlan,
    // The winner is resolved against the options drawn when the spin began, so a list
    // change arriving mid-spin cannot pick a slice that was never on screen.
    snapshot: Vec<WheelOption>,
}

/// Owns the spin lifecycle of a `WheelModel`.
#[derive(Debug, Clone)]
pub struct SpinController {
    model: WheelModel,
    config: SpinConfig,
    active: Option<ActiveSpin>,
}

impl SpinController {
    pub fn new(model: WheelModel, config: SpinConfig) -> Self {
        Self {
            model,
            config,
            active: None,
        }
    }

    pub fn model(&self) -> &WheelModel {
        &self.model
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    pub fn rotation(&self) -> f64 {
        self.model.rotation()
    }

    pub fn phase(&self) -> SpinPhase {
        if self.active.is_some() {
            SpinPhase::Spinning
        } else {
            SpinPhase::Idle
        }
    }

    /// Updates the live option list. An active spin keeps its snapshot.
    pub fn set_options(&mut self, options: Vec<WheelOption>) {
        self.model.set_options(options);
    }

    /// Options currently on screen: the spin snapshot while spinning, the live list otherwise.
    pub fn visible_options(&self) -> &[WheelOption] {
        match &self.active {
            Some(active) => &active.snapshot,
            None => self.model.options(),
        }
    }

    pub fn draw(&self, render: &mut dyn RenderSink) {
        render.draw(self.visible_options(), self.model.rotation());
    }

    pub fn spin(
        &mut self,
        now_ms: f64,
        rng: &mut dyn RandomSource,
    ) -> Result<SpinPlan, WheelError> {
        if self.active.is_some() {
            log::warn!("Ignoring spin request while the wheel is spinning");
            return Err(WheelError::AlreadySpinning);
        }
        if self.model.len() < MIN_OPTIONS {
            log::warn!("Refusing to spin with {} options", self.model.len());
            return Err(WheelError::InsufficientOptions);
        }

        let slice = self.model.slice_angle()?;
        let turns = rng.uniform(self.config.min_spins, self.config.max_spins);
        let offset = rng.uniform(0.0, self.config.max_slice_offset) * slice;

        let start_rotation = self.model.rotation().rem_euclid(TAU);
        let target_rotation = start_rotation + turns * TAU + offset;
        let plan = SpinPlan {
            started_at: now_ms,
            start_rotation,
            target_rotation,
        };

        log::debug!(
            "Spin started: {:.2} turns over {} ms across {} options",
            turns,
            self.config.duration_ms,
            self.model.len()
        );

        self.active = Some(ActiveSpin {
            plan,
            snapshot: self.model.options().to_vec(),
        });
        self.model.set_rotation(start_rotation);
        self.model.set_spinning(true);
        Ok(plan)
    }

    /// Moves the animation to `timestamp_ms` and renders the new angle.
    pub fn advance(
        &mut self,
        timestamp_ms: f64,
        render: &mut dyn RenderSink,
    ) -> Result<SpinStep, WheelError> {
        let Some(active) = &self.active else {
            return Ok(SpinStep::Idle);
        };
        let plan = active.plan;

        let elapsed = (timestamp_ms - plan.started_at).max(0.0);
        let progress = if self.config.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed / self.config.duration_ms).min(1.0)
        };

        let rotation = if progress >= 1.0 {
            plan.target_rotation
        } else {
            let eased = ease_out_cubic(progress);
            plan.start_rotation + (plan.target_rotation - plan.start_rotation) * eased
        };

        self.model.set_rotation(rotation);
        render.draw(&active.snapshot, rotation);

        if progress < 1.0 {
            return Ok(SpinStep::Running(rotation));
        }

        let finished = self.active.take();
        self.model.set_spinning(false);
        let snapshot = finished.map(|spin| spin.snapshot).unwrap_or_default();
        let winner = resolve_in(&snapshot, rotation)?.clone();
        log::debug!("Spin finished on '{}' at {:.4} rad", winner.label, rotation);
        Ok(SpinStep::Finished(winner))
    }

    /// Stops an active spin without resolving a winner. Returns whether a spin was stopped.
    pub fn cancel(&mut self) -> bool {
        if self.active.take().is_some() {
            self.model.set_spinning(false);
            log::debug!("Spin cancelled at {:.4} rad", self.model.rotation());
            true
        } else {
            false
        }
    }
}

/// Connects a `SpinController` to a frame scheduler and a render sink.
pub struct SpinDriver {
    controller: Rc<RefCell<SpinController>>,
    scheduler: Rc<dyn FrameScheduler>,
    render: Rc<RefCell<dyn RenderSink>>,
    pending: Cell<Option<FrameHandle>>,
    on_result: RefCell<Option<Box<dyn FnOnce(WheelOption)>>>,
}

impl SpinDriver {
    pub fn new(
        controller: Rc<RefCell<SpinController>>,
        scheduler: Rc<dyn FrameScheduler>,
        render: Rc<RefCell<dyn RenderSink>>,
    ) -> Rc<Self> {
        Rc::new(Self {
            controller,
            scheduler,
            render,
            pending: Cell::new(None),
            on_result: RefCell::new(None),
        })
    }

    pub fn controller(&self) -> &Rc<RefCell<SpinController>> {
        &self.controller
    }

    /// Renders the wheel once in its current state.
    pub fn draw(&self) {
        let controller = self.controller.borrow();
        let mut render = self.render.borrow_mut();
        controller.draw(&mut *render);
    }

    pub fn spin(
        self: &Rc<Self>,
        rng: &mut dyn RandomSource,
        on_result: impl FnOnce(WheelOption) + 'static,
    ) -> Result<SpinPlan, WheelError> {
        let now = self.scheduler.now();
        let plan = self.controller.borrow_mut().spin(now, rng)?;
        *self.on_result.borrow_mut() = Some(Box::new(on_result));
        self.schedule();
        Ok(plan)
    }

    pub fn cancel(&self) -> bool {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.on_result.borrow_mut().take();
        self.controller.borrow_mut().cancel()
    }

    fn schedule(self: &Rc<Self>) {
        let driver = Rc::clone(self);
        let handle = self
            .scheduler
            .request_frame(Box::new(move |timestamp| driver.on_frame(timestamp)));
        self.pending.set(Some(handle));
    }

    fn on_frame(self: &Rc<Self>, timestamp: f64) {
        self.pending.set(None);
        let step = {
            let mut controller = self.controller.borrow_mut();
            let mut render = self.render.borrow_mut();
            controller.advance(timestamp, &mut *render)
        };

        match step {
            Ok(SpinStep::Running(_)) => self.schedule(),
            Ok(SpinStep::Finished(winner)) => {
                let callback = self.on_result.borrow_mut().take();
                if let Some(callback) = callback {
                    callback(winner);
                }
            }
            Ok(SpinStep::Idle) => {}
            Err(e) => log::error!("Failed to resolve spin: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    fn four() -> Vec<WheelOption> {
        ["A", "B", "C", "D"]
            .iter()
            .enumerate()
            .map(|(i, label)| WheelOption::new(format!("id{}", i), *label))
            .collect()
    }

    fn controller(options: Vec<WheelOption>) -> SpinController {
        SpinController::new(WheelModel::new(options), SpinConfig::default())
    }

    fn noop() -> impl FnMut(&[WheelOption], f64) {
        |_: &[WheelOption], _: f64| {}
    }

    #[test]
    fn test_ease_out_cubic() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_spin_needs_two_options() {
        let mut spin = controller(four()[..1].to_vec());
        let result = spin.spin(0.0, &mut FixedRandom::new([7.0, 0.0]));
        assert_eq!(result, Err(WheelError::InsufficientOptions));
        assert_eq!(spin.phase(), SpinPhase::Idle);
        assert!(!spin.model().is_spinning());
    }

    #[test]
    fn test_spin_while_spinning_is_rejected() {
        let mut spin = controller(four());
        spin.spin(0.0, &mut FixedRandom::new([7.0, 0.0])).unwrap();
        spin.advance(1000.0, &mut noop()).unwrap();
        let rotation = spin.rotation();

        let again = spin.spin(1500.0, &mut FixedRandom::new([9.0, 0.5]));
        assert_eq!(again, Err(WheelError::AlreadySpinning));
        assert_eq!(spin.phase(), SpinPhase::Spinning);
        assert_eq!(spin.rotation(), rotation);
    }

    #[test]
    fn test_advance_follows_ease_out() {
        let mut spin = controller(four());
        let plan = spin.spin(100.0, &mut FixedRandom::new([7.0, 0.0])).unwrap();
        match spin.advance(2600.0, &mut noop()).unwrap() {
            SpinStep::Running(rotation) => {
                assert!((rotation - plan.target_rotation * 0.875).abs() < 1e-9);
            }
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_offset_scales_with_slice() {
        let mut spin = controller(four());
        let plan = spin.spin(0.0, &mut FixedRandom::new([5.0, 0.5])).unwrap();
        let expected = 5.0 * TAU + 0.5 * (PI / 2.0);
        assert!((plan.target_rotation - expected).abs() < 1e-9);
    }

    #[test]
    fn test_seeded_spin_stays_in_range() {
        let mut rng = RngSource::new(StdRng::seed_from_u64(42));
        for _ in 0..50 {
            let mut spin = controller(four());
            let plan = spin.spin(0.0, &mut rng).unwrap();
            let travel = plan.target_rotation - plan.start_rotation;
            assert!(travel >= 5.0 * TAU);
            assert!(travel < 10.0 * TAU + 0.8 * (PI / 2.0));
        }
    }

    #[test]
    fn test_next_spin_starts_from_normalized_rotation() {
        let mut spin = controller(four());
        spin.spin(0.0, &mut FixedRandom::new([5.0, 0.5])).unwrap();
        spin.advance(5000.0, &mut noop()).unwrap();
        let previous = spin.rotation();

        let plan = spin.spin(6000.0, &mut FixedRandom::new([5.0, 0.0])).unwrap();
        assert!((plan.start_rotation - previous.rem_euclid(TAU)).abs() < 1e-12);
        assert!(plan.start_rotation < TAU);
    }

    #[test]
    fn test_end_to_end_with_manual_scheduler() {
        let frames = Rc::new(RefCell::new(Vec::<f64>::new()));
        let recorder = frames.clone();
        let render: Rc<RefCell<dyn RenderSink>> = Rc::new(RefCell::new(
            move |_: &[WheelOption], rotation: f64| recorder.borrow_mut().push(rotation),
        ));
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let controller = Rc::new(RefCell::new(controller(four())));
        let driver = SpinDriver::new(controller.clone(), scheduler.clone(), render);

        let winner = Rc::new(RefCell::new(None));
        let slot = winner.clone();
        driver
            .spin(&mut FixedRandom::new([7.0, 0.0]), move |option| {
                *slot.borrow_mut() = Some(option)
            })
            .unwrap();

        let ran = scheduler.run_until_idle(16.0, 1000);
        assert!(ran > 300);
        assert_eq!(scheduler.pending(), 0);

        let controller = controller.borrow();
        assert_eq!(controller.phase(), SpinPhase::Idle);
        assert!((controller.rotation() - 14.0 * PI).abs() < 1e-9);
        assert_eq!(winner.borrow().as_ref().map(|o| o.label.as_str()), Some("D"));

        let frames = frames.borrow();
        assert!(frames.windows(2).all(|pair| pair[1] >= pair[0]));
        assert_eq!(frames.last().copied(), Some(controller.rotation()));
    }

    #[test]
    fn test_winner_uses_snapshot_from_spin_start() {
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let controller = Rc::new(RefCell::new(controller(four())));
        let render: Rc<RefCell<dyn RenderSink>> = Rc::new(RefCell::new(noop()));
        let driver = SpinDriver::new(controller.clone(), scheduler.clone(), render);

        let winner = Rc::new(RefCell::new(None));
        let slot = winner.clone();
        driver
            .spin(&mut FixedRandom::new([7.0, 0.0]), move |option| {
                *slot.borrow_mut() = Some(option)
            })
            .unwrap();

        scheduler.advance(16.0);
        controller
            .borrow_mut()
            .set_options(vec![WheelOption::new("z", "Z")]);
        assert_eq!(controller.borrow().visible_options().len(), 4);
        scheduler.run_until_idle(16.0, 1000);

        assert_eq!(winner.borrow().as_ref().map(|o| o.label.as_str()), Some("D"));
        assert_eq!(controller.borrow().visible_options().len(), 1);
    }

    #[test]
    fn test_cancel_skips_resolution() {
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let controller = Rc::new(RefCell::new(controller(four())));
        let render: Rc<RefCell<dyn RenderSink>> = Rc::new(RefCell::new(noop()));
        let driver = SpinDriver::new(controller.clone(), scheduler.clone(), render);

        let resolved = Rc::new(Cell::new(false));
        let flag = resolved.clone();
        driver
            .spin(&mut FixedRandom::new([7.0, 0.0]), move |_| flag.set(true))
            .unwrap();
        scheduler.advance(16.0);

        assert!(driver.cancel());
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(controller.borrow().phase(), SpinPhase::Idle);
        scheduler.run_until_idle(16.0, 1000);
        assert!(!resolved.get());
        assert!(!driver.cancel());
    }

    #[test]
    fn test_retry_from_result_callback() {
        let scheduler = Rc::new(ManualFrameScheduler::new());
        let controller = Rc::new(RefCell::new(controller(four())));
        let render: Rc<RefCell<dyn RenderSink>> = Rc::new(RefCell::new(noop()));
        let driver = SpinDriver::new(controller.clone(), scheduler.clone(), render);

        let results = Rc::new(RefCell::new(Vec::new()));
        let first = results.clone();
        let again = driver.clone();
        driver
            .spin(&mut FixedRandom::new([7.0, 0.0]), move |option| {
                first.borrow_mut().push(option);
                let second = first.clone();
                again
                    .spin(&mut FixedRandom::new([6.0, 0.0]), move |option| {
                        second.borrow_mut().push(option)
                    })
                    .unwrap();
            })
            .unwrap();

        scheduler.run_until_idle(16.0, 2000);
        assert_eq!(results.borrow().len(), 2);
        assert_eq!(controller.borrow().phase(), SpinPhase::Idle);
    }
}
