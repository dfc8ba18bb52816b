//! Core emulator primitives and traits.

pub mod cpu_6800;
pub mod logging;
pub mod memory;
pub mod types {
    use serde::{Deserialize, Serialize};

    /// Why a run slice stopped before (or when) its cycle budget ran out.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub enum StopReason {
        /// The full cycle budget was consumed
        BudgetExhausted,
        /// Execution reached a breakpoint address (instruction not yet executed)
        Breakpoint(u16),
        /// The CPU is halted and will not advance until reset
        Halted,
        /// The CPU is parked in WAI and idled out the rest of the budget
        Waiting,
        /// The machine is not powered
        PoweredOff,
    }

    /// Result of running a bounded slice of emulation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RunSummary {
        pub cycles: u64,
        pub instructions: u64,
        pub stop: StopReason,
    }

    impl RunSummary {
        pub fn new(stop: StopReason) -> Self {
            Self {
                cycles: 0,
                instructions: 0,
                stop,
            }
        }
    }
}

use serde_json::Value;

/// A CPU-like component that can be stepped; returns cycles consumed.
pub trait Cpu {
    type Error: std::error::Error + Send + Sync + 'static;

    fn reset(&mut self);
    fn step(&mut self) -> Result<u32, Self::Error>;
}

/// Description of a mount point (media slot) that a system supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPointInfo {
    /// Unique identifier for this mount point (e.g., "Monitor")
    pub id: String,
    /// User-friendly name for display (e.g., "Monitor ROM")
    pub name: String,
    /// File extensions accepted by this mount point (e.g., ["bin", "rom"])
    pub extensions: Vec<String>,
    /// Whether this mount point is required for the system to function
    pub required: bool,
}

/// A high-level System trait tying components together.
pub trait System {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reset the processor without a power cycle
    fn reset(&mut self);

    /// Emulate one scheduling slice and report how far it got.
    fn run_tick(&mut self) -> Result<types::RunSummary, Self::Error>;

    /// Return a JSON-serializable save state for debugging.
    /// Note: Save states should NOT include ROM data.
    fn save_state(&self) -> Value;

    /// Load a JSON save state.
    fn load_state(&mut self, v: &Value) -> Result<(), serde_json::Error>;

    /// Check if this system supports save/load state functionality
    fn supports_save_states(&self) -> bool {
        false
    }

    /// Get the list of mount points this system supports
    fn mount_points(&self) -> Vec<MountPointInfo>;

    /// Load media into a specific mount point
    fn mount(&mut self, mount_point_id: &str, data: &[u8]) -> Result<(), Self::Error>;

    /// Unload media from a specific mount point
    fn unmount(&mut self, mount_point_id: &str) -> Result<(), Self::Error>;

    /// Check if a mount point has media loaded
    fn is_mounted(&self, mount_point_id: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{RunSummary, StopReason};

    #[test]
    fn run_summary_starts_empty() {
        let s = RunSummary::new(StopReason::PoweredOff);
        assert_eq!(s.cycles, 0);
        assert_eq!(s.instructions, 0);
        assert_eq!(s.stop, StopReason::PoweredOff);
    }

    struct MockSystem {
        ticks: u64,
    }

    impl System for MockSystem {
        type Error = std::convert::Infallible;

        fn reset(&mut self) {
            self.ticks = 0;
        }

        fn run_tick(&mut self) -> Result<RunSummary, Self::Error> {
            self.ticks += 1;
            Ok(RunSummary {
                cycles: 100,
                instructions: 25,
                stop: StopReason::BudgetExhausted,
            })
        }

        fn save_state(&self) -> serde_json::Value {
            serde_json::json!({"mock": true, "version": 1, "ticks": self.ticks})
        }

        fn load_state(&mut self, v: &serde_json::Value) -> Result<(), serde_json::Error> {
            self.ticks = v["ticks"].as_u64().unwrap_or(0);
            Ok(())
        }

        fn mount_points(&self) -> Vec<MountPointInfo> {
            vec![MountPointInfo {
                id: "test".to_string(),
                name: "Test Slot".to_string(),
                extensions: vec!["bin".to_string()],
                required: false,
            }]
        }

        fn mount(&mut self, _mount_point_id: &str, _data: &[u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn unmount(&mut self, _mount_point_id: &str) -> Result<(), Self::Error> {
            Ok(())
        }

        fn is_mounted(&self, _mount_point_id: &str) -> bool {
            false
        }
    }

    #[test]
    fn mock_system_save_load_roundtrip() {
        let mut sys = MockSystem { ticks: 0 };
        sys.run_tick().unwrap();
        sys.run_tick().unwrap();
        let v = sys.save_state();
        let s = serde_json::to_string(&v).expect("serialize");
        let v2: serde_json::Value = serde_json::from_str(&s).expect("deserialize");
        let mut sys2 = MockSystem { ticks: 0 };
        assert!(sys2.load_state(&v2).is_ok());
        assert_eq!(sys2.ticks, 2);
    }

    #[test]
    fn test_system_supports_save_states() {
        let sys = MockSystem { ticks: 0 };
        // Default implementation returns false
        assert!(!sys.supports_save_states());
    }

    #[test]
    fn test_system_mount_points() {
        let sys = MockSystem { ticks: 0 };
        let mount_points = sys.mount_points();

        assert_eq!(mount_points.len(), 1);
        assert_eq!(mount_points[0].id, "test");
        assert!(!mount_points[0].required);
    }
}
