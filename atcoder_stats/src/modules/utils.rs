pub fn rate_to_color(rate: i32) -> String {
    match rate {
        i32::MIN..=399 => "gray",
        400..=799 => "brown",
        800..=1199 => "green",
        1200..=1599 => "cyan",
        1600..=1999 => "blue",
        2000..=2399 => "yellow",
        2400..=2799 => "orange",
        2800..=3199 => "red",
        3200..=3599 => "silver",
        _ => "gold",
    }
    .to_string()
}

/// Maps a raw difficulty below 400 onto the positive range the way ratings are displayed.
pub fn clip_difficulty(difficulty: i32) -> i32 {
    if difficulty >= 400 {
        difficulty
    } else {
        (400.0 / (1.0 - difficulty as f64 / 400.0).exp()).round() as i32
    }
}
