mod spinner;

pub use self::spinner::SpinnerWidget;
