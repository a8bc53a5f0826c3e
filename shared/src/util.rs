/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: per-process sequence, randomly seeded (4096 ids per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicI64, Ordering};

    static SEQUENCE: OnceLock<AtomicI64> = OnceLock::new();

    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits

    // Sequence instead of pure randomness: ids minted in the same
    // millisecond (one checkout inserts several rows) stay distinct
    let counter =
        SEQUENCE.get_or_init(|| AtomicI64::new(rand::thread_rng().gen_range(0..0x1000)));
    let seq = counter.fetch_add(1, Ordering::Relaxed) & 0xFFF; // 12 bits

    (ts << 12) | seq
}

/// Encode a non-negative integer in base36 (0-9a-z), lowest digits first reversed
pub fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
