//! Run-length grouping of on-seabed flags.

/// Inclusive `(start, end)` index range of one run of `true` flags.
pub type Run = (usize, usize);

/// Every maximal run of consecutive `true` flags, in order.
pub fn candidate_runs(flags: &[bool]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;

    for (i, &on) in flags.iter().enumerate() {
        match (on, open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                runs.push((start, i - 1));
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        runs.push((start, flags.len() - 1));
    }

    runs
}
