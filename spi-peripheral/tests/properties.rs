use itertools::iproduct;
use spi_peripheral::testbench::drive;
use spi_peripheral::*;

const HALF_PERIOD: u32 = 2;
const SETTLE: u32 = 6;

const PROFILES: [TimingProfile; 3] = [TimingProfile::CANONICAL, TimingProfile::DOUBLE_SYNC, TimingProfile::FALLING_COMMIT];

fn host(profile: TimingProfile) -> SpiHost { SpiHost::for_profile(profile, HALF_PERIOD).unwrap().with_settle(SETTLE) }

fn decoder_after_reset(profile: TimingProfile) -> SpiDecoder {
    let mut decoder = SpiDecoder::new(profile);
    for _ in 0..5 {
        decoder.tick(false, LineInputs::IDLE);
    }
    drive(&mut decoder, &host(profile).idle(5));
    decoder
}

/// Writes a distinct value into every register so that unchanged registers are observable.
fn preloaded(profile: TimingProfile) -> SpiDecoder {
    let mut decoder = decoder_after_reset(profile);
    for id in RegisterId::ALL {
        drive(&mut decoder, &host(profile).write(id.address(), 0xa0 | id.address()).unwrap());
    }
    assert_eq!(decoder.registers().snapshot(), [0xa0, 0xa1, 0xa2, 0xa3, 0xa4]);
    decoder
}

#[test]
fn reset_is_idempotent() {
    for profile in PROFILES {
        let mut decoder = preloaded(profile);

        // Reset in the middle of a transaction.
        let waveform = host(profile).write(0x02, 0x55).unwrap();
        for lines in waveform.iter().take(20) {
            decoder.tick(true, *lines);
        }
        assert_ne!(decoder.bit_count(), 0);

        decoder.tick(false, LineInputs { cs_n: false, sclk: true, copi: true });
        assert_eq!(decoder.registers().snapshot(), [0; 5]);
        assert_eq!(decoder.frame().raw(), 0);
        assert_eq!(decoder.bit_count(), 0);
        assert_eq!(decoder.phase(), Phase::Idle);

        let once = decoder;
        decoder.tick(false, LineInputs::IDLE);
        assert_eq!(decoder, once);
        assert_eq!(decoder, SpiDecoder::new(profile));
    }
}

#[test]
fn frame_round_trip() {
    for profile in PROFILES {
        let mut decoder = decoder_after_reset(profile);
        for (address, data) in iproduct!(0..=MAX_REGISTER_ADDRESS, 0..=u8::MAX) {
            let before = decoder.registers().snapshot();
            let commits = drive(&mut decoder, &host(profile).write(address, data).unwrap());

            let register = RegisterId::from_address(address).unwrap();
            assert_eq!(commits, vec![Commit { register, value: data }], "{} {:#04x} <- {:#04x}", profile, address, data);

            let mut expected = before;
            expected[usize::from(address)] = data;
            assert_eq!(decoder.registers().snapshot(), expected);
        }
    }
}

#[test]
fn write_flag_gates_commit() {
    for profile in PROFILES {
        let mut decoder = preloaded(profile);
        let before = decoder.registers().snapshot();
        for (address, data) in iproduct!([0, 1, 2, 3, 4, 5, 0x40, 0x7f], [0x00, 0x5a, 0xff]) {
            let frame = Frame::new(false, address, data).unwrap();
            assert!(drive(&mut decoder, &host(profile).send(frame)).is_empty());
            assert_eq!(decoder.registers().snapshot(), before);
        }
    }
}

#[test]
fn invalid_addresses_are_ignored() {
    for profile in PROFILES {
        let mut decoder = preloaded(profile);
        let before = decoder.registers().snapshot();
        for (address, data) in iproduct!(5..=frame::MAX_ADDRESS, [0x00, 0xff]) {
            assert!(drive(&mut decoder, &host(profile).write(address, data).unwrap()).is_empty());
        }
        assert_eq!(decoder.registers().snapshot(), before);
    }
}

#[test]
fn short_frames_are_discarded() {
    for profile in PROFILES {
        let host = host(profile);
        let mut decoder = preloaded(profile);
        let before = decoder.registers().snapshot();
        let frame = Frame::write(0x01, 0x3c).unwrap();

        for len in 0..16 {
            assert!(drive(&mut decoder, &host.clock_bits(&frame.bits()[..len])).is_empty());
            assert_eq!(decoder.registers().snapshot(), before);
            assert_eq!(decoder.bit_count(), len as u8);
        }

        // Nothing leaks into the next transaction.
        drive(&mut decoder, &host.send(frame));
        assert_eq!(decoder.registers().out_high(), 0x3c);
    }
}

#[test]
fn one_bit_per_edge() {
    let pattern = Frame::from_raw(0b1011_0011_1000_1101).bits();
    for profile in PROFILES {
        let host = host(profile);
        let mut decoder = decoder_after_reset(profile);
        for edges in 0..=20usize {
            let bits: Vec<bool> = pattern.iter().copied().cycle().take(edges).collect();
            drive(&mut decoder, &host.clock_bits(&bits));

            let accepted = edges.min(16);
            assert_eq!(usize::from(decoder.bit_count()), accepted);
            assert_eq!(decoder.frame().raw(), utils::bits_to_u16(bits[..accepted].iter().copied()));
        }
    }
}

#[test]
fn over_long_frame_commits_first_sixteen_bits() {
    let host = host(TimingProfile::CANONICAL);
    let mut decoder = decoder_after_reset(TimingProfile::CANONICAL);
    let mut bits = Frame::write(0x03, 0x81).unwrap().bits().to_vec();
    bits.extend([false, true, true, false, true]);
    let commits = drive(&mut decoder, &host.clock_bits(&bits));
    assert_eq!(commits, vec![Commit { register: RegisterId::PwmEnableHigh, value: 0x81 }]);
}

#[test]
fn first_frame_after_reset_commits() {
    for profile in PROFILES {
        let mut decoder = preloaded(profile);
        decoder.tick(false, LineInputs::IDLE);

        let commits = drive(&mut decoder, &host(profile).write(0x02, 0xff).unwrap());
        assert_eq!(commits, vec![Commit { register: RegisterId::PwmEnableLow, value: 0xff }], "{}", profile);
        assert_eq!(decoder.registers().snapshot(), [0x00, 0x00, 0xff, 0x00, 0x00]);
    }
}

#[test]
fn chip_select_held_through_reset_starts_a_transaction() {
    for profile in PROFILES {
        let mut decoder = SpiDecoder::new(profile);
        let frame = Frame::write(0x04, 0x42).unwrap();
        let waveform = host(profile).send(frame);

        // nCS is already low while reset is asserted.
        for _ in 0..3 {
            decoder.tick(false, LineInputs { cs_n: false, sclk: false, copi: false });
        }
        let commits = drive(&mut decoder, &waveform);
        assert_eq!(commits, vec![Commit { register: RegisterId::PwmDutyCycle, value: 0x42 }], "{}", profile);
    }
}

#[test]
fn pwm_enable_low_scenario() {
    let mut decoder = SpiDecoder::new(TimingProfile::CANONICAL);
    for _ in 0..5 {
        decoder.tick(false, LineInputs::IDLE);
    }

    let mut waveform = Waveform::new();
    waveform.hold(LineInputs::IDLE, 5).hold(LineInputs { cs_n: false, sclk: false, copi: false }, 3);
    for c in "1000001011111111".chars() {
        let copi = c == '1';
        waveform.hold(LineInputs { cs_n: false, sclk: false, copi }, 3);
        waveform.hold(LineInputs { cs_n: false, sclk: true, copi }, 3);
    }
    waveform.hold(LineInputs { cs_n: false, sclk: false, copi: false }, 3).hold(LineInputs::IDLE, 10);

    drive(&mut decoder, &waveform);
    assert_eq!(decoder.registers().pwm_enable_low(), 0xff);
    assert_eq!(decoder.registers().snapshot(), [0x00, 0x00, 0xff, 0x00, 0x00]);
}

#[test]
fn transaction_never_released_never_commits() {
    let host = host(TimingProfile::CANONICAL);
    let mut decoder = decoder_after_reset(TimingProfile::CANONICAL);
    let waveform = host.send(Frame::write(0x00, 0x77).unwrap());
    let held: Vec<LineInputs> = waveform.iter().copied().filter(|lines| !lines.cs_n).collect();
    for lines in &held {
        assert_eq!(decoder.tick(true, *lines), None);
    }
    for _ in 0..1000 {
        assert_eq!(decoder.tick(true, LineInputs { cs_n: false, sclk: false, copi: false }), None);
    }
    assert_eq!(decoder.phase(), Phase::Ready);
    assert_eq!(decoder.registers().out_low(), 0);
}

#[test]
fn single_tick_clock_pulse_is_one_edge() {
    let mut decoder = decoder_after_reset(TimingProfile::CANONICAL);
    let mut waveform = Waveform::new();
    waveform.hold(LineInputs { cs_n: false, sclk: false, copi: true }, 4);
    waveform.hold(LineInputs { cs_n: false, sclk: true, copi: true }, 1);
    waveform.hold(LineInputs { cs_n: false, sclk: false, copi: true }, 4);
    drive(&mut decoder, &waveform);
    assert_eq!(decoder.bit_count(), 1);
    assert_eq!(decoder.frame().raw(), 1);
}
