// Rating histogram: ten equal-width buckets over 0-10, written out as a
// standalone SVG bar chart.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::movie::{Catalog, MAX_RATING, MIN_RATING};

pub const BUCKETS: usize = 10;

const WIDTH: usize = 520;
const HEIGHT: usize = 320;
const MARGIN: usize = 40;

/// Counts ratings per bucket. A rating of exactly 10 lands in the last
/// bucket; out-of-range ratings are clamped to the nearest end.
pub fn bucket_counts(catalog: &Catalog) -> [usize; BUCKETS] {
    let mut counts = [0; BUCKETS];
    let width = (MAX_RATING - MIN_RATING) / BUCKETS as f64;
    for (_, movie) in catalog.iter() {
        if movie.rating.is_nan() {
            continue;
        }
        let idx = ((movie.rating - MIN_RATING) / width).floor().max(0.0) as usize;
        counts[idx.min(BUCKETS - 1)] += 1;
    }
    counts
}

pub fn render_svg(counts: &[usize; BUCKETS]) -> String {
    let peak = counts.iter().copied().max().unwrap_or(0).max(1);
    let plot_w = WIDTH - 2 * MARGIN;
    let plot_h = HEIGHT - 2 * MARGIN;
    let bar_w = plot_w / BUCKETS;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" font-family="sans-serif" font-size="11">"#
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="20" text-anchor="middle" font-size="14">Histogram of Movie Ratings</text>"#,
        WIDTH / 2
    );
    for (i, &count) in counts.iter().enumerate() {
        let h = count * plot_h / peak;
        let x = MARGIN + i * bar_w;
        let y = HEIGHT - MARGIN - h;
        let _ = writeln!(
            svg,
            r#"  <rect x="{x}" y="{y}" width="{bar_w}" height="{h}" fill="steelblue" stroke="black"/>"#
        );
        if count > 0 {
            let _ = writeln!(
                svg,
                r#"  <text x="{}" y="{}" text-anchor="middle">{count}</text>"#,
                x + bar_w / 2,
                y.saturating_sub(4)
            );
        }
        let _ = writeln!(
            svg,
            r#"  <text x="{x}" y="{}" text-anchor="middle">{i}</text>"#,
            HEIGHT - MARGIN + 14
        );
    }
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" text-anchor="middle">Movie Rating</text>"#,
        WIDTH / 2,
        HEIGHT - 8
    );
    svg.push_str("</svg>\n");
    svg
}

/// Writes the histogram for `catalog` to `path`.
pub fn generate(catalog: &Catalog, path: &Path) -> Result<()> {
    let svg = render_svg(&bucket_counts(catalog));
    fs::write(path, svg)?;
    info!("Wrote rating histogram to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movie::Movie;

    #[test]
    fn ratings_fall_into_expected_buckets() {
        let catalog: Catalog = [0.0, 0.99, 5.0, 9.5, 10.0]
            .iter()
            .enumerate()
            .map(|(i, &r)| (format!("m{i}"), Movie::new(2000, r, None)))
            .collect();
        let counts = bucket_counts(&catalog);
        assert_eq!(counts, [2, 0, 0, 0, 0, 1, 0, 0, 0, 2]);
    }

    #[test]
    fn svg_has_one_bar_per_bucket() {
        let svg = render_svg(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 3]);
        assert_eq!(svg.matches("<rect").count(), BUCKETS);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn empty_catalog_still_renders() {
        let svg = render_svg(&bucket_counts(&Catalog::new()));
        assert_eq!(svg.matches(r#"height="0""#).count(), BUCKETS);
    }
}
