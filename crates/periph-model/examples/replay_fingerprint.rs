//! Deterministic replay fingerprint used for cross-host comparison.

use periph_model::{
    GpioConfig, GpioInputs, InterruptEnables, LatencyMode, MemoryConfig, MemoryInit, ModelConfig,
    ModelError, ModelInputs, PeripheralModel, PortInput, WriteRequest,
};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

const TICKS: u32 = 256;

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

/// Small xorshift stream so the fingerprint depends only on this file.
fn next_word(state: &mut u32) -> u32 {
    *state ^= *state << 13;
    *state ^= *state >> 17;
    *state ^= *state << 5;
    *state
}

fn fingerprint(latency: LatencyMode) -> Result<String, ModelError> {
    let config = ModelConfig {
        gpio: GpioConfig {
            interrupt_enables: InterruptEnables {
                rising: 0x0000_00FF,
                falling: 0x0000_FF00,
                level_high: 0x00FF_0000,
                level_low: 0xFF00_0000,
            },
            ..GpioConfig::default()
        },
        memory: MemoryConfig {
            depth: 256,
            word_width: 32,
            latency,
        },
    };
    let mut model = PeripheralModel::new(config, MemoryInit::Zero)?;

    let mut rng = 0x2545_F491_u32;
    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for tick in 0..TICKS {
        let a = next_word(&mut rng);
        let b = next_word(&mut rng);
        let [b0, b1, b2, b3] = b.to_le_bytes();
        let inputs = ModelInputs {
            gpio: GpioInputs {
                pads: a,
                data_out: WriteRequest::MaskedWriteLower {
                    data: u16::from_le_bytes([b0, b1]),
                    mask: u16::from_le_bytes([b2, b3]),
                }
                .into(),
                interrupt_clear: if tick % 16 == 0 { u32::MAX } else { 0 },
                ..GpioInputs::default()
            },
            port_a: PortInput::write(usize::from(a.to_le_bytes()[0]), u64::from(b)),
            port_b: PortInput::read(usize::from(b0)),
        };
        let outputs = model.step(&inputs)?;

        hash_bytes(&mut hash, &outputs.gpio.pad_out.to_le_bytes());
        hash_bytes(&mut hash, &outputs.gpio.interrupt_status.to_le_bytes());
        hash_bytes(&mut hash, &outputs.memory.a.data_out.to_le_bytes());
        hash_bytes(&mut hash, &outputs.memory.b.data_out.to_le_bytes());
        hash_bytes(&mut hash, &[u8::from(outputs.memory.collision.is_some())]);
    }

    for cell in model.memory().cells() {
        hash_bytes(&mut hash, &cell.to_le_bytes());
    }
    hash_bytes(&mut hash, &model.cycle().to_le_bytes());

    Ok(format!("{hash:016x}"))
}

fn main() -> Result<(), ModelError> {
    for latency in [LatencyMode::LowLatency, LatencyMode::HighPerformance] {
        println!("{latency}: {}", fingerprint(latency)?);
    }
    Ok(())
}
