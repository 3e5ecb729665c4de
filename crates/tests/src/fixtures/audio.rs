use std::io::Cursor;

/// 16-bit PCM WAV holding a 440Hz tone.
pub fn tone_wav(secs: f32, sample_rate: u32, channels: u16) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        let frames = (secs * sample_rate as f32) as usize;
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            let sample = ((t * 440.0 * std::f32::consts::TAU).sin() * 0.3 * i16::MAX as f32) as i16;
            for _ in 0..channels {
                writer.write_sample(sample).expect("wav sample");
            }
        }
        writer.finalize().expect("wav finalize");
    }
    cursor.into_inner()
}
