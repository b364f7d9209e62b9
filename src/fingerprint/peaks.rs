/// Bins inspected before/after a candidate for the local-maximum test.
const PRE_MAX: usize = 3;
const POST_MAX: usize = 3;
/// Bins averaged before/after a candidate for the prominence test.
const PRE_AVG: usize = 3;
const POST_AVG: usize = 3;
/// Minimum rise above the local average, in decibels.
const DELTA_DB: f32 = 5.0;
/// Minimum bin separation from the previously accepted peak.
const WAIT_BINS: usize = 10;

/// Pick salient frequency bins from one decibel frame.
///
/// A bin qualifies when it is the maximum of its `±3`-bin neighborhood,
/// exceeds the neighborhood average by at least 5 dB, and sits at least 10
/// bins past the previously accepted peak. At most `max_peaks` bins are
/// returned, truncated positionally (no magnitude re-ranking).
pub(super) fn pick_peaks(frame: &[f32], max_peaks: usize) -> Vec<usize> {
    let cap = max_peaks.max(1);
    let mut peaks = Vec::new();
    let mut last_accepted: Option<usize> = None;
    for bin in 0..frame.len() {
        if peaks.len() >= cap {
            break;
        }
        if let Some(last) = last_accepted {
            if bin - last < WAIT_BINS {
                continue;
            }
        }
        let value = frame[bin];
        let max_lo = bin.saturating_sub(PRE_MAX);
        let max_hi = (bin + POST_MAX + 1).min(frame.len());
        if frame[max_lo..max_hi].iter().any(|&v| v > value) {
            continue;
        }
        let avg_lo = bin.saturating_sub(PRE_AVG);
        let avg_hi = (bin + POST_AVG + 1).min(frame.len());
        let neighborhood = &frame[avg_lo..avg_hi];
        let average = neighborhood.iter().sum::<f32>() / neighborhood.len() as f32;
        if value < average + DELTA_DB {
            continue;
        }
        peaks.push(bin);
        last_accepted = Some(bin);
    }
    peaks
}
