//! Sensor positions -> 2-D plotting boxes in the unit square (y grows upwards).
//!
//! Positions are projected with an azimuthal-equidistant projection around the
//! centre of the best-fitting sphere. Channels sharing one location (the two
//! gradiometers and the magnetometer of a MEG triplet) split that site's box side
//! by side. Channels without a location are lined up underneath the head.
use crate::types::RecordingInfo;
const MARGIN: f64 = 0.02;
const SAME_SITE_M: f64 = 1e-6;
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}
impl Rect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }
}
#[derive(Clone, Debug)]
pub struct LayoutBox {
    /// Row of the channel selection this box belongs to.
    pub index: usize,
    pub name: String,
    pub rect: Rect,
}
#[derive(Clone, Debug)]
pub struct TopoLayout {
    pub boxes: Vec<LayoutBox>,
}
struct Site {
    xy: (f64, f64),
    rows: Vec<usize>,
}
impl TopoLayout {
    /// One box per picked channel, ordered like `picks`.
    pub fn from_picks(info: &RecordingInfo, picks: &[usize]) -> Self {
        let positions: Vec<Option<[f64; 3]>> =
            picks.iter().map(|&p| info.channels[p].position).collect();
        let located: Vec<[f64; 3]> = positions.iter().flatten().copied().collect();
        let center = fit_sphere_center(&located);
        let mut sites: Vec<([f64; 3], Site)> = Vec::new();
        let mut unplaced = Vec::new();
        for (row, pos) in positions.iter().enumerate() {
            let Some(pos) = pos else {
                unplaced.push(row);
                continue;
            };
            if let Some((_, site)) = sites
                .iter_mut()
                .find(|(p, _)| distance3(p, pos) < SAME_SITE_M)
            {
                site.rows.push(row);
            } else {
                sites.push((
                    *pos,
                    Site {
                        xy: project(pos, &center),
                        rows: vec![row],
                    },
                ));
            }
        }
        let mut sites: Vec<Site> = sites.into_iter().map(|(_, s)| s).collect();
        let size = site_size(&sites);
        if !unplaced.is_empty() {
            let (min_x, min_y) = sites.iter().fold((0.0f64, 0.0f64), |acc, s| {
                (acc.0.min(s.xy.0), acc.1.min(s.xy.1))
            });
            let y = if sites.is_empty() { 0.0 } else { min_y - 1.5 * size };
            for (i, row) in unplaced.into_iter().enumerate() {
                sites.push(Site {
                    xy: (min_x + i as f64 * size, y),
                    rows: vec![row],
                });
            }
        }
        let mut boxes = Vec::with_capacity(picks.len());
        let half = size * 0.45;
        let (lo_x, hi_x, lo_y, hi_y) = sites.iter().fold(
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
            |(lx, hx, ly, hy), s| {
                (
                    lx.min(s.xy.0 - half),
                    hx.max(s.xy.0 + half),
                    ly.min(s.xy.1 - half),
                    hy.max(s.xy.1 + half),
                )
            },
        );
        let span = (hi_x - lo_x).max(hi_y - lo_y).max(f64::EPSILON);
        let scale = (1.0 - 2.0 * MARGIN) / span;
        let off_x = 0.5 - (lo_x + hi_x) * 0.5 * scale;
        let off_y = 0.5 - (lo_y + hi_y) * 0.5 * scale;
        for site in &sites {
            let side = 2.0 * half * scale;
            let part = side / site.rows.len() as f64;
            let left = (site.xy.0 - half) * scale + off_x;
            let bottom = (site.xy.1 - half) * scale + off_y;
            for (slot, &row) in site.rows.iter().enumerate() {
                boxes.push(LayoutBox {
                    index: row,
                    name: info.channels[picks[row]].name.clone(),
                    rect: Rect {
                        x: left + slot as f64 * part,
                        y: bottom,
                        w: part,
                        h: side,
                    },
                });
            }
        }
        boxes.sort_by_key(|b| b.index);
        log::debug!("layout: {} boxes on {} sites", boxes.len(), sites.len());
        Self { boxes }
    }
    pub fn len(&self) -> usize {
        self.boxes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
fn distance3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}
fn project(pos: &[f64; 3], center: &[f64; 3]) -> (f64, f64) {
    let v = [pos[0] - center[0], pos[1] - center[1], pos[2] - center[2]];
    let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if r < f64::EPSILON {
        return (0.0, 0.0);
    }
    let theta = (v[2] / r).clamp(-1.0, 1.0).acos();
    let phi = v[1].atan2(v[0]);
    (theta * phi.cos(), theta * phi.sin())
}
/// Nearest-neighbour spacing of the projected sites.
fn site_size(sites: &[Site]) -> f64 {
    let mut best = f64::MAX;
    for (i, a) in sites.iter().enumerate() {
        for b in &sites[i + 1..] {
            let d = ((a.xy.0 - b.xy.0).powi(2) + (a.xy.1 - b.xy.1).powi(2)).sqrt();
            if d > f64::EPSILON {
                best = best.min(d);
            }
        }
    }
    if best == f64::MAX {
        1.0
    } else {
        best
    }
}
/// Least-squares sphere fit, `|p|^2 = 2 c . p + d`. Falls back to the centroid
/// when the points do not pin down a sphere.
fn fit_sphere_center(points: &[[f64; 3]]) -> [f64; 3] {
    if points.is_empty() {
        return [0.0; 3];
    }
    let n = points.len() as f64;
    let centroid = points.iter().fold([0.0; 3], |acc, p| {
        [acc[0] + p[0] / n, acc[1] + p[1] / n, acc[2] + p[2] / n]
    });
    let mut ata = [[0.0f64; 4]; 4];
    let mut atb = [0.0f64; 4];
    for p in points {
        let row = [2.0 * p[0], 2.0 * p[1], 2.0 * p[2], 1.0];
        let rhs = p[0] * p[0] + p[1] * p[1] + p[2] * p[2];
        for i in 0..4 {
            for j in 0..4 {
                ata[i][j] += row[i] * row[j];
            }
            atb[i] += row[i] * rhs;
        }
    }
    match solve4(ata, atb) {
        Some(x) if x.iter().all(|v| v.is_finite()) => [x[0], x[1], x[2]],
        _ => centroid,
    }
}
fn solve4(mut a: [[f64; 4]; 4], mut b: [f64; 4]) -> Option<[f64; 4]> {
    for col in 0..4 {
        let pivot = (col..4).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() < 1e-12 {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for r in col + 1..4 {
            let f = a[r][col] / a[col][col];
            for c in col..4 {
                a[r][c] -= f * a[col][c];
            }
            b[r] -= f * b[col];
        }
    }
    let mut x = [0.0; 4];
    for r in (0..4).rev() {
        let s: f64 = (r + 1..4).map(|c| a[r][c] * x[c]).sum();
        x[r] = (b[r] - s) / a[r][r];
    }
    Some(x)
}
