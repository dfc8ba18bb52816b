use emu_core::System;
use emu_et3400::{Et3400System, MachineConfig, ROM_SIZE};

/// Tiny monitor: light segment g on all six digits, then wait
fn dashes_rom() -> Vec<u8> {
    let mut code = vec![0x86, 0x01]; // LDAA #$01
    for slot in 1..=6u8 {
        code.extend_from_slice(&[0xB7, 0xC1, slot << 4]); // STAA $C1s0
    }
    code.push(0x3E); // WAI

    let mut rom = vec![0u8; ROM_SIZE];
    rom[..code.len()].copy_from_slice(&code);
    rom[ROM_SIZE - 2] = 0xFC;
    rom[ROM_SIZE - 1] = 0x00;
    rom
}

fn main() {
    let mut sys = Et3400System::new(&dashes_rom(), MachineConfig::default());
    sys.power_button();
    let summary = sys.run_tick().unwrap();
    println!("Headless ET-3400 tick: {:?}", summary);
    println!("Display: [{}]", sys.display().render());
    println!("Save-state: {}", serde_json::to_string_pretty(&sys.save_state()).unwrap());
}
