#![no_main]

use libfuzzer_sys::fuzz_target;
use periph_model::{
    GpioInputs, LatencyMode, MemoryConfig, MemoryInit, ModelConfig, ModelInputs, PeripheralModel,
    PortInput, RegisterBus, WriteRequest, WriteSet,
};

const DEPTH: usize = 64;
const FRAME: usize = 16;

fn word(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn write_set(tag: u8, value: u32) -> WriteSet {
    let [lo0, lo1, hi0, hi1] = value.to_le_bytes();
    let data = u16::from_le_bytes([lo0, lo1]);
    let mask = u16::from_le_bytes([hi0, hi1]);
    match tag % 4 {
        0 => WriteSet::NONE,
        1 => WriteRequest::DirectWrite(value).into(),
        2 => WriteRequest::MaskedWriteLower { data, mask }.into(),
        _ => WriteSet::from(WriteRequest::MaskedWriteUpper { data, mask })
            .with(WriteRequest::MaskedWriteLower { data: mask, mask: data }),
    }
}

fn port(flags: u8, address: u8, data: u8) -> PortInput {
    PortInput {
        // out-of-range addresses exercise the rejection path
        address: usize::from(address) % (DEPTH + 4),
        write_enable: flags & 0x1 != 0,
        write_data: u64::from(data) << (flags >> 4),
        enable: flags & 0x2 != 0,
        output_enable: flags & 0x4 != 0,
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&mode, frames)) = data.split_first() else {
        return;
    };
    let config = ModelConfig {
        memory: MemoryConfig {
            depth: DEPTH,
            word_width: 12,
            latency: if mode & 1 == 0 {
                LatencyMode::LowLatency
            } else {
                LatencyMode::HighPerformance
            },
        },
        ..ModelConfig::default()
    };
    let Ok(mut model) = PeripheralModel::new(config, MemoryInit::Zero) else {
        return;
    };

    for frame in frames.chunks_exact(FRAME) {
        let control = frame[0];
        if control & 0x80 != 0 {
            let _ = model.write32(u32::from(frame[1]), word(&frame[4..8]));
        }
        if control & 0x40 != 0 {
            model.assert_reset();
        } else if control & 0x20 != 0 {
            model.release_reset();
        }

        let before = model.cycle();
        let inputs = ModelInputs {
            gpio: GpioInputs {
                pads: word(&frame[4..8]),
                data_out: write_set(control, word(&frame[8..12])),
                data_oe: write_set(control >> 2, !word(&frame[8..12])),
                interrupt_clear: u32::from(frame[2]),
            },
            port_a: port(frame[12], frame[13], frame[3]),
            port_b: port(frame[14], frame[15], frame[1]),
        };
        match model.step(&inputs) {
            Ok(outputs) => {
                assert_eq!(model.cycle(), before + 1);
                if let Some(collision) = outputs.memory.collision {
                    assert_eq!(collision.address, inputs.port_a.address);
                }
            }
            Err(_) => assert_eq!(model.cycle(), before),
        }
    }
});
