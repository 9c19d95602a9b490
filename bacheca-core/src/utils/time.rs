use chrono::{Local, NaiveDateTime, Utc};

/// Formato della data aggiunta dal worker, es. "2025-11-02 12:34:56.123456".
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Orologio usato per marcare i record.
///
/// `Local` risolve il fuso dal database tz a ogni lettura, quindi segue i
/// cambi di ora legale anche in un worker che resta acceso per mesi.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    Local,
    Utc,
}

impl Clock {
    pub fn now(self) -> NaiveDateTime {
        match self {
            Clock::Local => Local::now().naive_local(),
            Clock::Utc => Utc::now().naive_utc(),
        }
    }
}

/// Restituisce l'istante corrente secondo `clock`, con precisione al microsecondo.
pub fn now_timestamp(clock: Clock) -> String {
    clock.now().format(DATE_FORMAT).to_string()
}

/// Inverso di [`now_timestamp`].
pub fn parse_timestamp(value: &str) -> chrono::ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATE_FORMAT)
}
