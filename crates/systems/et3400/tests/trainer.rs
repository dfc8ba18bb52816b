//! End-to-end tests driving the trainer through small 6800 programs

use emu_core::cpu_6800::{ExecState, FLAG_N, FLAG_V, FLAG_Z};
use emu_core::types::StopReason;
use emu_core::System;
use emu_et3400::display::{SEG_A, SEG_B};
use emu_et3400::{
    DisplayEvent, DisplaySnapshot, Et3400System, Key, KeyEvent, MachineConfig, ProgramImage,
    ROM_SIZE,
};

fn monitor(code: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; ROM_SIZE];
    rom[..code.len()].copy_from_slice(code);
    rom[0x3FE] = 0xFC;
    rom[0x3FF] = 0x00;
    rom
}

fn key(s: &str) -> Key {
    s.parse().unwrap()
}

/// LDS #$00FF; LDAA #$01; STAA $C166; STAA $C165; WAI
const LIGHT_TWO_SEGMENTS: [u8; 12] = [
    0x8E, 0x00, 0xFF, 0x86, 0x01, 0xB7, 0xC1, 0x66, 0xB7, 0xC1, 0x65, 0x3E,
];

/// LDAA $C006; STAA $80; BRA back
const ECHO_ROW_ZERO: [u8; 7] = [0xB6, 0xC0, 0x06, 0x97, 0x80, 0x20, 0xF9];

#[test]
fn cpu_store_to_latch_reaches_subscriber() {
    let mut sys = Et3400System::new(&monitor(&LIGHT_TWO_SEGMENTS), MachineConfig::default());
    let rx = sys.subscribe_display();
    sys.power_button();

    let summary = sys.run_tick().unwrap();
    assert_eq!(summary.stop, StopReason::Waiting);

    let events: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            DisplayEvent::Snapshot(DisplaySnapshot::default()),
            DisplayEvent::Digit {
                index: 0,
                segments: SEG_A
            },
            DisplayEvent::Digit {
                index: 0,
                segments: SEG_A | SEG_B
            },
        ]
    );
    assert_eq!(sys.display().digits[0], SEG_A | SEG_B);
}

#[test]
fn power_off_blanks_display_for_observers() {
    let mut sys = Et3400System::new(&monitor(&LIGHT_TWO_SEGMENTS), MachineConfig::default());
    sys.power_button();
    sys.run_tick().unwrap();
    let rx = sys.subscribe_display();

    sys.power_button();
    assert!(!sys.is_powered());
    assert_eq!(sys.run_tick().unwrap().stop, StopReason::PoweredOff);

    let events: Vec<_> = rx.try_iter().skip(1).collect();
    assert_eq!(
        events,
        vec![DisplayEvent::Digit {
            index: 0,
            segments: 0
        }]
    );
}

#[test]
fn program_sees_queued_key_through_scan_window() {
    let mut sys = Et3400System::new(&monitor(&ECHO_ROW_ZERO), MachineConfig::default());
    sys.power_button();
    sys.run_tick().unwrap();
    assert_eq!(sys.peek(0x0080), 0xFF);

    sys.queue_key_event(KeyEvent::Press(key("4")));
    sys.run_tick().unwrap();
    assert_eq!(sys.peek(0x0080), 0xF7);

    // A key in another row does not show in row 0
    sys.queue_key_event(KeyEvent::Release(key("4")));
    sys.queue_key_event(KeyEvent::Press(key("5")));
    sys.run_tick().unwrap();
    assert_eq!(sys.peek(0x0080), 0xFF);
}

#[test]
fn multi_key_policy_reaches_program() {
    let config = MachineConfig {
        key_policy: emu_et3400::KeyPolicy::MultiKey,
        ..Default::default()
    };
    let mut sys = Et3400System::new(&monitor(&ECHO_ROW_ZERO), config);
    sys.power_button();
    sys.press_key(key("0"));
    sys.press_key(key("D"));
    sys.run_tick().unwrap();
    assert_eq!(sys.peek(0x0080), 0xDE);
}

#[test]
fn loaded_program_runs_from_set_pc() {
    let mut sys = Et3400System::new(&monitor(&[0x20, 0xFE]), MachineConfig::default());
    sys.power_button();
    // LDAA #$7F; INCA; BRA *
    let image = ProgramImage::Pairs(vec![
        (0x0000, 0x86),
        (0x0001, 0x7F),
        (0x0002, 0x4C),
        (0x0003, 0x20),
        (0x0004, 0xFE),
    ]);
    let report = sys.load_program(&image).unwrap();
    assert_eq!(report.written, 5);

    sys.set_pc(0x0000);
    sys.step().unwrap();
    sys.step().unwrap();
    let regs = sys.registers();
    assert_eq!(regs.a, 0x80);
    assert_ne!(regs.ccr & FLAG_V, 0);
    assert_ne!(regs.ccr & FLAG_N, 0);
    assert_eq!(regs.ccr & FLAG_Z, 0);
    assert_eq!(regs.pc, 0x0003);
}

#[test]
fn loading_over_rom_leaves_it_intact() {
    let rom = monitor(&ECHO_ROW_ZERO);
    let mut sys = Et3400System::new(&rom, MachineConfig::default());
    let image = ProgramImage::Block {
        start: 0xFBFE,
        bytes: vec![0x11, 0x22, 0x33, 0x44],
    };
    let report = sys.load_program(&image).unwrap();
    assert_eq!((report.written, report.rejected), (2, 2));
    assert_eq!(sys.peek(0xFBFF), 0x22);
    assert_eq!(sys.peek(0xFC00), rom[0]);
    assert_eq!(sys.peek(0xFC01), rom[1]);
    assert_eq!(sys.rom_rejected_writes(), 2);
}

#[test]
fn reset_key_recovers_halted_cpu() {
    let mut sys = Et3400System::new(&monitor(&ECHO_ROW_ZERO), MachineConfig::default());
    sys.power_button();
    sys.load_program(&ProgramImage::Pairs(vec![(0x0000, 0x02)])).unwrap();
    sys.set_pc(0x0000);
    assert_eq!(sys.run_tick().unwrap().stop, StopReason::Halted);
    assert!(sys.last_fault().is_some());

    sys.press_key(Key::Reset);
    assert_eq!(sys.cpu_state(), ExecState::Running);
    assert_eq!(sys.registers().pc, 0xFC00);
    sys.release_key(Key::Reset);
    assert_eq!(sys.run_tick().unwrap().stop, StopReason::BudgetExhausted);
}

#[test]
fn restored_state_runs_identically() {
    let rom = monitor(&ECHO_ROW_ZERO);
    let mut a = Et3400System::new(&rom, MachineConfig::default());
    a.power_button();
    a.press_key(key("7"));
    a.run_tick().unwrap();

    let saved = serde_json::to_string(&a.save_state()).unwrap();
    let mut b = Et3400System::new(&rom, MachineConfig::default());
    b.load_state(&serde_json::from_str(&saved).unwrap()).unwrap();
    assert!(b.is_pressed(key("7")));

    a.run_tick().unwrap();
    b.run_tick().unwrap();
    assert_eq!(a.registers(), b.registers());
    assert_eq!(a.cycles(), b.cycles());
    assert_eq!(b.peek(0x0080), 0xFB);
}
