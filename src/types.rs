// Whether touching raises or lowers the raw reading relative to the rolling
// baseline. Latched after one inference; only an explicit polarity reset
// returns it to Unset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Unset,
    Normal,
    Reverse,
}

impl Direction {
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Normal => "normal",
            Self::Reverse => "reverse",
        }
    }
}

// Opening, Closing and Remaining are the machine's own phases; Open and
// Closed are derived readouts at the ends of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandState {
    Open,
    Opening,
    Closing,
    Closed,
    Remaining,
}

impl HandState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Opening => "opening",
            Self::Closing => "closing",
            Self::Closed => "closed",
            Self::Remaining => "remaining",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandCommand {
    Close,
    Open,
}

// One loop iteration's observations, for tracing and host diagnostics.
// Averages repeat the classifier's most recent sampling tick when the
// iteration fell between sample intervals.
#[derive(Clone, Copy, Debug)]
pub struct TickReport {
    pub state: HandState,
    pub touched: bool,
    pub raw: u16,
    pub calibration_avg: u16,
    pub touch_avg: u16,
    pub target: i32,
    pub position: i32,
}
