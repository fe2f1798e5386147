//! Arithmetic, drawing and control-flow properties checked over generated inputs.

use chip8_vm::{Cpu, Options, Quirks};
use proptest::prelude::*;

fn setup_cpu(program: &[u16]) -> Cpu {
    let mut cpu = Cpu::with_options(Options::default().seeded(7));
    let rom: Vec<u8> = program.iter().flat_map(|word| word.to_be_bytes()).collect();
    cpu.load_program(&rom);
    cpu
}

proptest! {
    #[test]
    fn add_sets_carry_iff_sum_overflows(a in any::<u8>(), b in any::<u8>()) {
        let mut cpu = setup_cpu(&[0x8124]);
        cpu.set_v(1, a);
        cpu.set_v(2, b);
        cpu.cycle().unwrap();

        let sum = a as u16 + b as u16;
        prop_assert_eq!(cpu.v(1), (sum % 256) as u8);
        prop_assert_eq!(cpu.v(0xF), (sum > 255) as u8);
    }

    #[test]
    fn sub_sets_flag_iff_minuend_is_greater(a in any::<u8>(), b in any::<u8>()) {
        let mut cpu = setup_cpu(&[0x8125]);
        cpu.set_v(1, a);
        cpu.set_v(2, b);
        cpu.cycle().unwrap();

        prop_assert_eq!(cpu.v(1), a.wrapping_sub(b));
        prop_assert_eq!(cpu.v(0xF), (a > b) as u8);
    }

    #[test]
    fn reverse_sub_sets_flag_iff_subtrahend_is_greater(a in any::<u8>(), b in any::<u8>()) {
        let mut cpu = setup_cpu(&[0x8127]);
        cpu.set_v(1, a);
        cpu.set_v(2, b);
        cpu.cycle().unwrap();

        prop_assert_eq!(cpu.v(1), b.wrapping_sub(a));
        prop_assert_eq!(cpu.v(0xF), (b > a) as u8);
    }

    #[test]
    fn shifts_capture_the_bit_shifted_out(value in any::<u8>(), original_shift in any::<bool>()) {
        let quirks = Quirks::new(original_shift, false);
        let mut cpu = Cpu::with_options(Options::with_quirks(quirks).seeded(7));
        cpu.load_program(&[0x81, 0x26, 0x83, 0x4E]);
        let (shr_src, shl_src) = if original_shift { (2, 4) } else { (1, 3) };
        cpu.set_v(shr_src, value);
        cpu.set_v(shl_src, value);

        cpu.cycle().unwrap();
        prop_assert_eq!(cpu.v(1), value >> 1);
        prop_assert_eq!(cpu.v(0xF), value & 1);

        cpu.cycle().unwrap();
        prop_assert_eq!(cpu.v(3), value << 1);
        prop_assert_eq!(cpu.v(0xF), value >> 7);
    }

    #[test]
    fn drawing_twice_restores_the_screen(
        background in proptest::collection::vec(any::<u8>(), 15),
        sprite in proptest::collection::vec(any::<u8>(), 1..16),
        (bx, by, x, y) in (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>()),
    ) {
        let height = sprite.len() as u16;
        // Background sprite from 0x300 at (V2, V3), then the sprite under test from 0x320 at
        // (V0, V1), drawn twice.
        let mut cpu = setup_cpu(&[0xA300, 0xD23F, 0xA320, 0xD010 | height, 0xD010 | height]);
        cpu.memory_mut().write_slice(0x300, &background).unwrap();
        cpu.memory_mut().write_slice(0x320, &sprite).unwrap();
        cpu.set_v(0, x);
        cpu.set_v(1, y);
        cpu.set_v(2, bx);
        cpu.set_v(3, by);

        cpu.cycle().unwrap();
        cpu.cycle().unwrap();
        let before = cpu.screen().pixels().to_vec();

        let touched: Vec<usize> = sprite
            .iter()
            .enumerate()
            .flat_map(|(row, &bits)| {
                (0..8usize)
                    .filter(move |dx| (bits >> (7 - dx)) & 1 == 1)
                    .map(move |dx| ((y as usize + row) % 32) * 64 + (x as usize + dx) % 64)
            })
            .collect();

        cpu.cycle().unwrap();
        cpu.cycle().unwrap();
        prop_assert_eq!(cpu.v(0xF), touched.iter().any(|&p| before[p]) as u8);

        cpu.cycle().unwrap();
        prop_assert_eq!(cpu.screen().pixels(), &before[..]);
        prop_assert_eq!(cpu.v(0xF), touched.iter().any(|&p| !before[p]) as u8);
    }

    #[test]
    fn nested_calls_return_in_order(depth in 1usize..=16) {
        // Each subroutine at 0x300 + 4n calls the next one, the last returns.
        // 0x200: CALL 0x300
        let mut cpu = setup_cpu(&[0x2300]);
        for n in 0..depth {
            let addr = 0x300 + 4 * n;
            let next = if n + 1 < depth {
                0x2000 | (addr + 4) as u16
            } else {
                0x00EE
            };
            let bytes: Vec<u8> = [next, 0x00EE].iter().flat_map(|w| w.to_be_bytes()).collect();
            cpu.memory_mut().write_slice(addr, &bytes).unwrap();
        }

        for _ in 0..depth {
            cpu.cycle().unwrap();
        }
        prop_assert_eq!(cpu.stack_depth(), depth);
        prop_assert_eq!(cpu.pc() as usize, 0x300 + 4 * (depth - 1));

        // Each RET lands just after the call that entered the current subroutine, where another
        // RET unwinds one more level.
        cpu.cycle().unwrap();
        for n in (0..depth - 1).rev() {
            prop_assert_eq!(cpu.pc() as usize, 0x300 + 4 * n + 2);
            cpu.cycle().unwrap();
        }
        prop_assert_eq!(cpu.pc(), 0x202);
        prop_assert_eq!(cpu.stack_depth(), 0);
    }

    #[test]
    fn wait_for_key_holds_pc_until_pressed(idle in 0usize..32, key in 0usize..16) {
        let mut cpu = setup_cpu(&[0xF70A]);
        for _ in 0..idle {
            cpu.cycle().unwrap();
            prop_assert_eq!(cpu.pc(), 0x200);
        }
        cpu.set_key(key, true);
        cpu.cycle().unwrap();
        prop_assert_eq!(cpu.pc(), 0x202);
        prop_assert_eq!(cpu.v(7), key as u8);
    }
}
