pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Integer per-mille scaling with floor semantics, `value * reference / 1000`.
pub(crate) fn per_mille_floor(value: i64, reference: i64) -> i64 {
    (value * reference).div_euclid(1000)
}
