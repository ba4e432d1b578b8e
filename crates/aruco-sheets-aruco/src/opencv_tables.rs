//! Family tables read from OpenCV's predefined dictionaries.

use opencv::core::{Mat, MatTraitConst};
use opencv::objdetect::{self, DictionaryTraitConst, PredefinedDictionaryType};
use std::sync::OnceLock;

/// One slot per grid size, 4x4 through 7x7.
static FAMILIES: [OnceLock<Vec<u64>>; 4] = [const { OnceLock::new() }; 4];

/// The 1000-code family for `marker_size`, loaded once.
///
/// Empty when the size has no OpenCV family or OpenCV fails to provide it.
pub(crate) fn family(marker_size: usize) -> &'static [u64] {
    let Some(slot) = marker_size.checked_sub(4).and_then(|i| FAMILIES.get(i)) else {
        return &[];
    };
    slot.get_or_init(|| match load(marker_size) {
        Ok(codes) => codes,
        Err(e) => {
            log::warn!("OpenCV {marker_size}x{marker_size} dictionary unavailable: {e}");
            Vec::new()
        }
    })
}

fn load(marker_size: usize) -> opencv::Result<Vec<u64>> {
    let kind = match marker_size {
        4 => PredefinedDictionaryType::DICT_4X4_1000,
        5 => PredefinedDictionaryType::DICT_5X5_1000,
        6 => PredefinedDictionaryType::DICT_6X6_1000,
        7 => PredefinedDictionaryType::DICT_7X7_1000,
        _ => return Ok(Vec::new()),
    };
    let dict = objdetect::get_predefined_dictionary(kind)?;
    let bytes = dict.bytes_list();
    (0..bytes.rows())
        .map(|id| {
            let row = bytes.row(id)?.try_clone()?;
            let bits = objdetect::Dictionary::get_bits_from_byte_list(&row, marker_size as i32)?;
            pack_bits(&bits, marker_size)
        })
        .collect()
}

/// Pack an `n × n` bit matrix (non-zero = white) row-major into a code.
fn pack_bits(bits: &Mat, n: usize) -> opencv::Result<u64> {
    let mut code = 0u64;
    for y in 0..n {
        for x in 0..n {
            if *bits.at_2d::<u8>(y as i32, x as i32)? != 0 {
                code |= 1 << (y * n + x);
            }
        }
    }
    Ok(code)
}
