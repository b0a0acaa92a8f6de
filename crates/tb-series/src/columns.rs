//! Header resolution for recorded channels.

use crate::{SeriesError, SeriesResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Date,
    Time,
    Input,
    Output,
    Reservoir,
}

impl Channel {
    /// Header name as written by the bench logger.
    pub fn header(self) -> &'static str {
        match self {
            Channel::Date => "Date",
            Channel::Time => "Time",
            Channel::Input => "Input (°C)",
            Channel::Output => "Output (°C)",
            Channel::Reservoir => "Reservoir (°C)",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Channel::Date => "date",
            Channel::Time => "time",
            Channel::Input => "input",
            Channel::Output => "output",
            Channel::Reservoir => "reservoir",
        }
    }
}

/// Column index of each channel in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub time: usize,
    pub input: usize,
    pub output: usize,
    pub reservoir: Option<usize>,
}

impl ColumnMap {
    /// Match headers case-insensitively on the name before any unit suffix,
    /// so `Input (°C)`, `input(°C)` and `INPUT` all resolve.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> SeriesResult<Self> {
        let find = |channel: Channel| {
            headers
                .iter()
                .position(|h| header_key(h.as_ref()) == channel.key())
        };
        let require = |channel: Channel| {
            find(channel).ok_or(SeriesError::MissingColumn {
                column: channel.header(),
            })
        };

        Ok(Self {
            date: require(Channel::Date)?,
            time: require(Channel::Time)?,
            input: require(Channel::Input)?,
            output: require(Channel::Output)?,
            reservoir: find(Channel::Reservoir),
        })
    }
}

fn header_key(header: &str) -> String {
    let name = header.split('(').next().unwrap_or(header);
    name.trim().to_lowercase()
}
