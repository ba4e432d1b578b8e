//! Global Otsu threshold.

fn histogram(samples: &[u8]) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for &v in samples {
        hist[v as usize] += 1;
    }
    hist
}

/// Otsu threshold of `samples`; values strictly above it are the bright class.
///
/// Degenerate inputs: no samples gives 127, a single gray level gives that
/// level and two levels give their midpoint.
pub fn otsu_threshold(samples: &[u8]) -> u8 {
    let hist = histogram(samples);
    let occupied: Vec<u8> = (0..=255u8).filter(|&v| hist[v as usize] > 0).collect();
    match occupied.as_slice() {
        [] => return 127,
        [only] => return *only,
        [lo, hi] => return ((*lo as u16 + *hi as u16) / 2) as u8,
        _ => {}
    }

    let total = samples.len() as f64;
    let sum_total: f64 = hist
        .iter()
        .enumerate()
        .map(|(v, &h)| v as f64 * h as f64)
        .sum();

    let mut w_dark = 0.0f64;
    let mut sum_dark = 0.0f64;
    let mut best = (f64::MIN, 127u8);
    for (t, &h) in hist.iter().enumerate() {
        w_dark += h as f64;
        sum_dark += t as f64 * h as f64;
        if w_dark == 0.0 {
            continue;
        }
        let w_bright = total - w_dark;
        if w_bright == 0.0 {
            break;
        }
        let diff = sum_dark / w_dark - (sum_total - sum_dark) / w_bright;
        let between = w_dark * w_bright * diff * diff;
        if between > best.0 {
            best = (between, t as u8);
        }
    }
    best.1
}
