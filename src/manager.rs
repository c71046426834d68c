//! Multi-device aggregator.
//!
//! [`ControllerSet`] owns up to [`MAX_CONTROLLERS`] devices, one per jack, and
//! polls them in slot order. Events come out tagged with the slot they were
//! read from, so a single host handler can serve both jacks.

use crate::device::{Device, PollStatus};
use crate::error::{Error, Result};
use crate::event::{ChangeEvent, ControllerEvent, DaptorMode};
use crate::snapshot::{ControllerInfo, Snapshot};
use tracing::{debug, info, warn};

/// Left and right jack.
pub const MAX_CONTROLLERS: usize = 2;

#[derive(Default)]
struct Slot {
    device: Option<Box<dyn Device>>,
    last_status: Option<PollStatus>,
    mode: Option<i32>,
}

#[derive(Default)]
pub struct ControllerSet {
    slots: [Slot; MAX_CONTROLLERS],
}

impl ControllerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a device into a slot, returning whatever was there before.
    pub fn attach<D: Device + 'static>(
        &mut self,
        slot: usize,
        device: D,
    ) -> Result<Option<Box<dyn Device>>> {
        let entry = self.slot_mut(slot)?;
        info!(slot, device = %device.identity(), "controller attached");
        let previous = entry.device.replace(Box::new(device));
        entry.last_status = None;
        entry.mode = None;
        Ok(previous)
    }

    pub fn detach(&mut self, slot: usize) -> Option<Box<dyn Device>> {
        let entry = self.slots.get_mut(slot)?;
        entry.last_status = None;
        entry.mode = None;
        let device = entry.device.take();
        if let Some(d) = &device {
            info!(slot, device = %d.identity(), "controller detached");
        }
        device
    }

    pub fn device(&self, slot: usize) -> Option<&dyn Device> {
        self.slots.get(slot)?.device.as_deref()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.device.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Poll every attached device in slot order and collect the tagged events.
    pub fn poll_all(&mut self) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        self.poll_with(|e| events.push(*e));
        events
    }

    /// Poll every attached device in slot order, handing each event to `handler`
    /// as soon as it is detected.
    ///
    /// A platform failure on one slot is logged and recorded as `Unplugged`; the
    /// remaining slots are still polled.
    ///
    /// The baseline poll after attach, reset or input loss dispatches nothing, so
    /// the set reports a mode the device has not announced itself as a
    /// `ModeChanged` event at the end of that slot's events.
    pub fn poll_with(&mut self, mut handler: impl FnMut(&ControllerEvent)) {
        for (controller, slot) in self.slots.iter_mut().enumerate() {
            let Some(device) = slot.device.as_mut() else {
                continue;
            };
            let mut announced = false;
            let mut tag = |event: &ChangeEvent| {
                announced |= matches!(event, ChangeEvent::ModeChanged { .. });
                handler(&ControllerEvent {
                    controller,
                    event: *event,
                })
            };
            let status = match device.poll(&mut tag) {
                Ok(status) => status,
                Err(e) => {
                    warn!(slot = controller, error = %e, "poll failed");
                    PollStatus::Unplugged
                }
            };
            if slot.last_status != Some(status) {
                debug!(slot = controller, ?status, "poll status changed");
            }
            slot.last_status = Some(status);

            // Buffers are zeroed or stale unless the read succeeded.
            if status != PollStatus::Ok {
                continue;
            }
            let mode = device.mode();
            if mode != slot.mode && !announced {
                if let Some(mode) = mode {
                    debug!(slot = controller, mode, "mode reported");
                    handler(&ControllerEvent {
                        controller,
                        event: ChangeEvent::ModeChanged { mode },
                    });
                }
            }
            slot.mode = mode;
        }
    }

    /// Zero the state buffers of every attached device.
    pub fn reset_all(&mut self) {
        for slot in self.slots.iter_mut() {
            if let Some(device) = slot.device.as_mut() {
                device.reset();
            }
        }
    }

    pub fn last_status(&self, slot: usize) -> Option<PollStatus> {
        self.slots.get(slot)?.last_status
    }

    /// Daptor II mode code last seen on `slot`.
    pub fn mode(&self, slot: usize) -> Option<i32> {
        self.slots.get(slot)?.mode
    }

    /// Product name, suffixed with the mode for Daptor II adapters.
    /// Empty for an empty or out-of-range slot.
    pub fn controller_info(&self, slot: usize) -> String {
        let Some(device) = self.device(slot) else {
            return String::new();
        };
        let mut info = device.name().to_string();
        if device.identity().kind.has_mode_switch() {
            let mode = DaptorMode::from_code(self.mode(slot).unwrap_or(-1));
            if let Some(label) = mode.label() {
                info.push_str(&format!(" ({label})"));
            }
        }
        info
    }

    pub fn left_jack_has_adaptor(&self) -> bool {
        self.jack_has_adaptor(0)
    }

    pub fn right_jack_has_adaptor(&self) -> bool {
        self.jack_has_adaptor(1)
    }

    /// Per-slot status view; empty slots are skipped.
    pub fn snapshot(&self) -> Snapshot {
        let controllers = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(slot, s)| {
                let device = s.device.as_ref()?;
                let identity = device.identity();
                Some(ControllerInfo {
                    slot,
                    product_name: identity.product_name.clone(),
                    description: self.controller_info(slot),
                    kind: identity.kind,
                    mode: s.mode,
                    last_status: s.last_status,
                })
            })
            .collect();
        Snapshot::new(controllers)
    }

    fn jack_has_adaptor(&self, slot: usize) -> bool {
        self.device(slot)
            .map(|d| d.identity().kind.is_atari_adaptor())
            .unwrap_or(false)
    }

    fn slot_mut(&mut self, slot: usize) -> Result<&mut Slot> {
        self.slots.get_mut(slot).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "controller slot {slot} out of range (max {MAX_CONTROLLERS})"
            ))
        })
    }
}
