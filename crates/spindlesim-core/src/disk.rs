//! Single-platter hard-disk model.
//!
//! Geometry is immutable after construction; the only mutable state is the
//! head position, which changes exclusively through [`Disk::move_head`] when
//! a seek completes. Access time decomposes into three parts:
//!
//! ```text
//! seek (head movement) + rotational latency (half a revolution on average)
//!                      + transfer (one sector under the head)
//! ```
//!
//! Seeking considers three candidate paths: the direct move, a move routed
//! through track 0, and a move routed through the outermost track. The edge
//! routes model a firmware recalibration rail that costs a fixed
//! `seek_time_to_edge` plus the per-track cost from that edge.

/// Which of the three candidate seek paths won, for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekPath {
    /// Straight move between the two tracks.
    Direct { tracks: u64 },
    /// Recalibrate at track 0, then move out to the target.
    ViaStart { tracks: u64 },
    /// Recalibrate at the outermost track, then move in to the target.
    ViaEnd { edge: u64, tracks: u64 },
}

impl std::fmt::Display for SeekPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct { tracks } => write!(f, "direct {tracks} tracks"),
            Self::ViaStart { tracks } => write!(f, "via track 0 ({tracks} tracks)"),
            Self::ViaEnd { edge, tracks } => write!(f, "via track {edge} ({tracks} tracks)"),
        }
    }
}

/// Hard-disk geometry, derived timing constants, and head position.
#[derive(Debug, Clone)]
pub struct Disk {
    num_tracks: u64,
    sectors_per_track: u64,
    seek_time_per_track: f64,
    seek_time_to_edge: f64,
    rpm: f64,
    rotation_time: f64,
    avg_rotational_latency: f64,
    sector_transfer_time: f64,
    current_track: u64,
}

impl Disk {
    /// Build a disk model. Times are milliseconds, `rpm` revolutions per
    /// minute. The head starts at track 0.
    pub fn new(
        num_tracks: u64,
        sectors_per_track: u64,
        seek_time_per_track: f64,
        seek_time_to_edge: f64,
        rpm: f64,
    ) -> Self {
        let rotation_time = 60_000.0 / rpm;
        Self {
            num_tracks,
            sectors_per_track,
            seek_time_per_track,
            seek_time_to_edge,
            rpm,
            rotation_time,
            avg_rotational_latency: rotation_time / 2.0,
            sector_transfer_time: rotation_time / sectors_per_track as f64,
            current_track: 0,
        }
    }

    pub fn num_tracks(&self) -> u64 {
        self.num_tracks
    }

    pub fn sectors_per_track(&self) -> u64 {
        self.sectors_per_track
    }

    pub fn total_sectors(&self) -> u64 {
        self.num_tracks * self.sectors_per_track
    }

    pub fn rotation_time(&self) -> f64 {
        self.rotation_time
    }

    pub fn avg_rotational_latency(&self) -> f64 {
        self.avg_rotational_latency
    }

    pub fn sector_transfer_time(&self) -> f64 {
        self.sector_transfer_time
    }

    pub fn current_track(&self) -> u64 {
        self.current_track
    }

    /// Track holding the given sector.
    pub fn track_of(&self, sector: u64) -> u64 {
        sector / self.sectors_per_track
    }

    /// Cheapest way to move the head to `target`, as (milliseconds, path).
    ///
    /// Ties resolve Direct, then Via-0, then Via-end.
    pub fn seek_cost(&self, target: u64) -> (f64, SeekPath) {
        let direct_tracks = self.current_track.abs_diff(target);
        let direct_time = direct_tracks as f64 * self.seek_time_per_track;

        let via_start_tracks = self.current_track + target;
        let via_start_time =
            self.seek_time_to_edge + via_start_tracks as f64 * self.seek_time_per_track;

        let edge = self.num_tracks - 1;
        let via_end_tracks = (edge - self.current_track) + (edge - target);
        let via_end_time =
            self.seek_time_to_edge + via_end_tracks as f64 * self.seek_time_per_track;

        if direct_time <= via_start_time && direct_time <= via_end_time {
            (
                direct_time,
                SeekPath::Direct {
                    tracks: direct_tracks,
                },
            )
        } else if via_start_time <= via_end_time {
            (
                via_start_time,
                SeekPath::ViaStart {
                    tracks: via_start_tracks,
                },
            )
        } else {
            (
                via_end_time,
                SeekPath::ViaEnd {
                    edge,
                    tracks: via_end_tracks,
                },
            )
        }
    }

    /// Place the head on `target`. Called exactly once per I/O, when the
    /// seek completes.
    pub fn move_head(&mut self, target: u64) {
        debug_assert!(target < self.num_tracks);
        self.current_track = target;
    }

    pub fn describe(&self) -> String {
        format!(
            "HardDisk: {} tracks, {} sectors/track, {} RPM, current position: track {}",
            self.num_tracks, self.sectors_per_track, self.rpm, self.current_track
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk() -> Disk {
        Disk::new(10_000, 500, 0.5, 10.0, 7_500.0)
    }

    #[test]
    fn test_derived_constants() {
        let d = disk();
        assert_eq!(d.rotation_time(), 8.0);
        assert_eq!(d.avg_rotational_latency(), 4.0);
        assert_eq!(d.sector_transfer_time(), 0.016);
    }

    #[test]
    fn test_track_of_sector() {
        let d = disk();
        assert_eq!(d.track_of(0), 0);
        assert_eq!(d.track_of(499), 0);
        assert_eq!(d.track_of(500), 1);
        assert_eq!(d.track_of(1250), 2);
    }

    #[test]
    fn test_direct_seek_from_start() {
        let d = disk();
        let (time, path) = d.seek_cost(5);
        assert_eq!(time, 2.5);
        assert_eq!(path, SeekPath::Direct { tracks: 5 });
    }

    #[test]
    fn test_seek_to_current_track_is_free() {
        let mut d = disk();
        d.move_head(42);
        let (time, path) = d.seek_cost(42);
        assert_eq!(time, 0.0);
        assert_eq!(path, SeekPath::Direct { tracks: 0 });
    }

    #[test]
    fn test_tie_break_prefers_direct() {
        // With a zero-cost recalibration and the head at 0, the direct and
        // via-0 paths cost the same; the direct tag must win.
        let d = Disk::new(100, 1, 1.0, 0.0, 7_500.0);
        let (time, path) = d.seek_cost(30);
        assert_eq!(time, 30.0);
        assert_eq!(path, SeekPath::Direct { tracks: 30 });
    }

    #[test]
    fn test_seek_symmetry() {
        // The three-path formula gives the same cost from a to b as from
        // b to a.
        let mut from_a = disk();
        from_a.move_head(1200);
        let mut from_b = disk();
        from_b.move_head(8700);
        assert_eq!(from_a.seek_cost(8700).0, from_b.seek_cost(1200).0);
    }

    #[test]
    fn test_move_head_updates_position() {
        let mut d = disk();
        assert_eq!(d.current_track(), 0);
        d.move_head(9_999);
        assert_eq!(d.current_track(), 9_999);
    }

    #[test]
    fn test_describe_reports_geometry_and_position() {
        let mut d = disk();
        d.move_head(17);
        let text = d.describe();
        assert!(text.contains("10000 tracks"));
        assert!(text.contains("500 sectors/track"));
        assert!(text.contains("track 17"));
    }

    #[test]
    fn test_path_descriptions() {
        assert_eq!(SeekPath::Direct { tracks: 5 }.to_string(), "direct 5 tracks");
        assert_eq!(
            SeekPath::ViaStart { tracks: 12 }.to_string(),
            "via track 0 (12 tracks)"
        );
        assert_eq!(
            SeekPath::ViaEnd {
                edge: 9_999,
                tracks: 14
            }
            .to_string(),
            "via track 9999 (14 tracks)"
        );
    }
}
