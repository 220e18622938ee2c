//! Deterministic synthetic market data for integration and property tests.
//!
//! Seeded generation keeps failures reproducible: the same seed always
//! produces the same frame, and generated bars maintain the OHLCV
//! invariants (high >= open, close >= low).

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ta_frame::{Frame, Series};

/// Generates a seeded positive random-walk price series starting at 100.
pub fn random_walk(len: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut prices = Vec::with_capacity(len);
    let mut price = 100.0_f64;
    for _ in 0..len {
        price = (price + rng.gen_range(-1.0..1.0)).max(1.0);
        prices.push(price);
    }
    prices
}

/// Generates a seeded OHLCV frame with the standard role columns.
pub fn ohlcv_frame(len: usize, seed: u64) -> Frame<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let close = random_walk(len, seed.wrapping_add(1));

    let mut open = Vec::with_capacity(len);
    let mut high = Vec::with_capacity(len);
    let mut low = Vec::with_capacity(len);
    let mut volume = Vec::with_capacity(len);
    for (i, &c) in close.iter().enumerate() {
        let o = if i == 0 { c } else { close[i - 1] };
        let spread_up: f64 = rng.gen_range(0.0..1.0);
        let spread_down: f64 = rng.gen_range(0.0..1.0);
        open.push(o);
        high.push(c.max(o) + spread_up);
        low.push((c.min(o) - spread_down).max(0.5));
        volume.push(rng.gen_range(100.0..10_000.0));
    }

    let mut frame = Frame::with_capacity(5);
    for (name, values) in [
        ("open", open),
        ("high", high),
        ("low", low),
        ("close", close),
        ("volume", volume),
    ] {
        frame
            .push(Series::new(name, values))
            .expect("fresh frame accepts equal-length columns");
    }
    frame
}
