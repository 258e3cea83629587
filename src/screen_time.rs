//! Parent-set screen-time countdown and the play gate.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenTime {
    pub limit_minutes: Option<u32>,
    pub remaining_seconds: u32,
    pub is_active: bool,
}

/// Result of one countdown tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// No limit set, or already expired.
    Idle,
    Running { remaining_seconds: u32 },
    /// Reached zero on this tick. Reported once.
    Expired,
}

impl ScreenTime {
    /// `Some(m)` with `m > 0` arms a fresh countdown; anything else clears it.
    pub fn set_limit(&mut self, minutes: Option<i64>) {
        *self = match minutes {
            Some(m) if m > 0 => {
                let m = u32::try_from(m).unwrap_or(u32::MAX / 60);
                ScreenTime {
                    limit_minutes: Some(m),
                    remaining_seconds: m.saturating_mul(60),
                    is_active: true,
                }
            }
            _ => ScreenTime::default(),
        };
    }

    pub fn tick(&mut self) -> Tick {
        if !self.is_active || self.remaining_seconds == 0 {
            return Tick::Idle;
        }
        self.remaining_seconds -= 1;
        if self.remaining_seconds == 0 {
            self.is_active = false;
            Tick::Expired
        } else {
            Tick::Running {
                remaining_seconds: self.remaining_seconds,
            }
        }
    }

    pub fn can_play(&self) -> bool {
        self.limit_minutes.is_none() || (self.is_active && self.remaining_seconds > 0)
    }

    pub fn is_expired(&self) -> bool {
        self.limit_minutes.is_some() && !self.can_play()
    }

    /// `m:ss` for the parent overlay; empty when no limit is set.
    pub fn remaining_label(&self) -> String {
        if self.limit_minutes.is_none() {
            return String::new();
        }
        format!("{}:{:02}", self.remaining_seconds / 60, self.remaining_seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_minutes_runs_out_after_300_ticks() {
        let mut st = ScreenTime::default();
        st.set_limit(Some(5));
        assert_eq!(st.remaining_seconds, 300);
        assert!(st.is_active);
        let mut expired = 0;
        for _ in 0..300 {
            if st.tick() == Tick::Expired {
                expired += 1;
            }
        }
        assert_eq!(expired, 1);
        assert!(!st.is_active);
        assert_eq!(st.remaining_seconds, 0);
        assert!(!st.can_play());
        assert!(st.is_expired());

        let before = st;
        assert_eq!(st.tick(), Tick::Idle);
        assert_eq!(st, before);
    }

    #[test]
    fn test_no_limit_always_plays() {
        let mut st = ScreenTime::default();
        assert!(st.can_play());
        assert_eq!(st.tick(), Tick::Idle);
        assert_eq!(st.remaining_label(), "");
    }

    #[test]
    fn test_non_positive_limit_clears() {
        let mut st = ScreenTime::default();
        st.set_limit(Some(3));
        st.set_limit(Some(0));
        assert_eq!(st, ScreenTime::default());
        st.set_limit(Some(-2));
        assert_eq!(st, ScreenTime::default());
        st.set_limit(None);
        assert!(st.can_play());
    }

    #[test]
    fn test_new_limit_rearms_after_expiry() {
        let mut st = ScreenTime::default();
        st.set_limit(Some(1));
        for _ in 0..60 {
            st.tick();
        }
        assert!(!st.can_play());
        st.set_limit(Some(2));
        assert!(st.can_play());
        assert_eq!(st.remaining_seconds, 120);
    }

    #[test]
    fn test_label() {
        let mut st = ScreenTime::default();
        st.set_limit(Some(2));
        st.tick();
        assert_eq!(st.remaining_label(), "1:59");
    }
}
