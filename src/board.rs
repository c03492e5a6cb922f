//! Board support capability used to bracket a transmission
//!
//! Boards with a watchdog (or any periodic maintenance timer able to reset
//! the system when starved) suspend it for the length of a frame.

/// Maintenance timer control
pub trait BoardSupport {
    fn suspend_maintenance_timer(&mut self);

    fn resume_maintenance_timer(&mut self);
}

/// Board without a maintenance timer
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMaintenanceTimer;

impl BoardSupport for NoMaintenanceTimer {
    fn suspend_maintenance_timer(&mut self) {}

    fn resume_maintenance_timer(&mut self) {}
}

impl<B: BoardSupport + ?Sized> BoardSupport for &mut B {
    fn suspend_maintenance_timer(&mut self) {
        (**self).suspend_maintenance_timer();
    }

    fn resume_maintenance_timer(&mut self) {
        (**self).resume_maintenance_timer();
    }
}

/// Scoped suspension of the maintenance timer
///
/// The timer is resumed when the guard is dropped.
pub(crate) struct MaintenanceGuard<'a, B: BoardSupport> {
    board: &'a mut B,
}

impl<'a, B: BoardSupport> MaintenanceGuard<'a, B> {
    pub(crate) fn suspend(board: &'a mut B) -> Self {
        board.suspend_maintenance_timer();
        Self { board }
    }
}

impl<B: BoardSupport> Drop for MaintenanceGuard<'_, B> {
    fn drop(&mut self) {
        self.board.resume_maintenance_timer();
    }
}
