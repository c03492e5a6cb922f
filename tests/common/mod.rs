#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use ws2811_driver::{
    ACTIVE_PROFILE, BoardSupport, GpioBinding, Level, OutputPort, PinBinding, PinId, PinMask, PinMode,
    TimingProfile,
};

/// Pins the mock board maps; anything above is unresolvable
pub const MAPPED_PINS: PinId = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortEvent {
    High(PinMask),
    Low(PinMask),
    Delay(u32),
}

/// Output register that records every edge and delay
#[derive(Debug, Default)]
pub struct RecordingPort {
    pub events: Vec<PortEvent>,
}

impl OutputPort for RecordingPort {
    fn set_high(&mut self, mask: PinMask) {
        self.events.push(PortEvent::High(mask));
    }

    fn set_low(&mut self, mask: PinMask) {
        self.events.push(PortEvent::Low(mask));
    }

    fn delay_cycles(&mut self, cycles: u32) {
        self.events.push(PortEvent::Delay(cycles));
    }
}

impl RecordingPort {
    /// Line phases as `(level, cycles)`, starting from a low line
    ///
    /// Repeated writes of the same level extend the current phase.
    pub fn phases(&self) -> Vec<(Level, u32)> {
        let mut phases: Vec<(Level, u32)> = Vec::new();
        for event in &self.events {
            match *event {
                PortEvent::High(_) => start_phase(&mut phases, Level::High),
                PortEvent::Low(_) => start_phase(&mut phases, Level::Low),
                PortEvent::Delay(cycles) => {
                    if phases.is_empty() {
                        phases.push((Level::Low, 0));
                    }
                    if let Some(last) = phases.last_mut() {
                        last.1 += cycles;
                    }
                }
            }
        }
        phases
    }

    pub fn masks(&self) -> Vec<PinMask> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                PortEvent::High(mask) | PortEvent::Low(mask) => Some(mask),
                PortEvent::Delay(_) => None,
            })
            .collect()
    }
}

fn start_phase(phases: &mut Vec<(Level, u32)>, level: Level) {
    match phases.last() {
        Some((current, _)) if *current == level => {}
        None if level == Level::Low => phases.push((Level::Low, 0)),
        _ => phases.push((level, 0)),
    }
}

/// Decode phase pairs back into bytes, returning the trailing low time
pub fn decode(phases: &[(Level, u32)], profile: &TimingProfile) -> (Vec<u8>, u32) {
    let mut bits = Vec::new();
    let mut trailing = 0;
    let mut iter = phases.iter().peekable();
    while let Some(&(level, high)) = iter.next() {
        assert_eq!(level, Level::High, "bit must start with a high phase");
        let &(level, low) = iter.next().expect("high phase without low phase");
        assert_eq!(level, Level::Low);

        if iter.peek().is_none() {
            // Final bit: its low phase is merged with the reset gap
            trailing = low;
            let nominal_low = if high == profile.high_one {
                profile.low_one
            } else {
                profile.low_zero
            };
            assert!(low >= nominal_low + profile.reset_gap);
            bits.push(high == profile.high_one);
            break;
        }

        if high == profile.high_one {
            assert_eq!(low, profile.low_one, "one bit low phase");
            bits.push(true);
        } else {
            assert_eq!(high, profile.high_zero, "zero bit high phase");
            assert_eq!(low, profile.low_zero, "zero bit low phase");
            bits.push(false);
        }
    }

    let bytes = bits
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
        .collect();
    (bytes, trailing)
}

/// Board pin map that records mode changes and writes
#[derive(Debug, Default)]
pub struct MockGpio {
    pub modes: Vec<(PinId, PinMode)>,
    pub writes: Vec<(PinId, Level)>,
    pub resolved: Vec<PinId>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last mode set on a pin
    pub fn mode(&self, pin: PinId) -> Option<PinMode> {
        self.modes
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, mode)| *mode)
    }

    pub fn level(&self, pin: PinId) -> Option<Level> {
        self.writes
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, level)| *level)
    }
}

impl GpioBinding for MockGpio {
    type Port = RecordingPort;

    fn resolve(&mut self, pin: PinId) -> Option<PinBinding<RecordingPort>> {
        if pin >= MAPPED_PINS {
            return None;
        }
        self.resolved.push(pin);
        Some(PinBinding::new(
            pin,
            PinMask::bit(pin % 8),
            RecordingPort::default(),
        ))
    }

    fn set_mode(&mut self, pin: PinId, mode: PinMode) {
        self.modes.push((pin, mode));
    }

    fn write(&mut self, pin: PinId, level: Level) {
        self.writes.push((pin, level));
    }
}

/// Board that counts maintenance timer suspensions
#[derive(Debug, Default)]
pub struct CountingBoard {
    pub suspended: u32,
    pub resumed: u32,
}

impl CountingBoard {
    pub fn is_suspended(&self) -> bool {
        self.suspended > self.resumed
    }
}

impl BoardSupport for CountingBoard {
    fn suspend_maintenance_timer(&mut self) {
        self.suspended += 1;
    }

    fn resume_maintenance_timer(&mut self) {
        self.resumed += 1;
    }
}

/// Whether another thread is currently locked out of `critical_section::with`
///
/// Spawns a contender and waits briefly for it to enter. With the `std`
/// implementation the section is a global lock, so a contender that cannot
/// get in means the caller is holding it. The contender is left to finish
/// once the section is released.
pub fn critical_section_held() -> bool {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        critical_section::with(|_| {
            let _ = tx.send(());
        });
    });
    rx.recv_timeout(Duration::from_millis(100)).is_err()
}

/// Board whose timer state is shared with a [`WatchedPort`]
#[derive(Debug, Default)]
pub struct SharedTimerBoard {
    pub suspended: Rc<Cell<bool>>,
}

impl BoardSupport for SharedTimerBoard {
    fn suspend_maintenance_timer(&mut self) {
        self.suspended.set(true);
    }

    fn resume_maintenance_timer(&mut self) {
        self.suspended.set(false);
    }
}

/// Output register that checks the environment of every edge
#[derive(Debug)]
pub struct WatchedPort {
    timer_suspended: Rc<Cell<bool>>,
    pub edges: u32,
    /// Edges driven while the maintenance timer was running
    pub edges_with_timer: u32,
    /// Critical section state seen at the first edge of each frame
    pub section_held: Vec<bool>,
    in_frame: bool,
}

impl WatchedPort {
    fn new(timer_suspended: Rc<Cell<bool>>) -> Self {
        Self {
            timer_suspended,
            edges: 0,
            edges_with_timer: 0,
            section_held: Vec::new(),
            in_frame: false,
        }
    }

    fn edge(&mut self) {
        self.edges += 1;
        if !self.timer_suspended.get() {
            self.edges_with_timer += 1;
        }
        if !self.in_frame {
            self.in_frame = true;
            self.section_held.push(critical_section_held());
        }
    }
}

impl OutputPort for WatchedPort {
    fn set_high(&mut self, _mask: PinMask) {
        self.edge();
    }

    fn set_low(&mut self, _mask: PinMask) {
        self.edge();
    }

    fn delay_cycles(&mut self, cycles: u32) {
        if cycles >= ACTIVE_PROFILE.reset_gap {
            self.in_frame = false;
        }
    }
}

/// Pin map handing out [`WatchedPort`]s tied to a [`SharedTimerBoard`]
#[derive(Debug, Default)]
pub struct WatchedGpio {
    pub timer_suspended: Rc<Cell<bool>>,
}

impl WatchedGpio {
    /// Pin map and board sharing one timer flag
    pub fn with_board() -> (Self, SharedTimerBoard) {
        let flag = Rc::new(Cell::new(false));
        (
            Self {
                timer_suspended: Rc::clone(&flag),
            },
            SharedTimerBoard { suspended: flag },
        )
    }
}

impl GpioBinding for WatchedGpio {
    type Port = WatchedPort;

    fn resolve(&mut self, pin: PinId) -> Option<PinBinding<WatchedPort>> {
        Some(PinBinding::new(
            pin,
            PinMask::bit(pin % 8),
            WatchedPort::new(Rc::clone(&self.timer_suspended)),
        ))
    }

    fn set_mode(&mut self, _pin: PinId, _mode: PinMode) {}

    fn write(&mut self, _pin: PinId, _level: Level) {}
}
