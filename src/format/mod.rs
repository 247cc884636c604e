//! Leaf formatters for values shown in views.
//!
//! Every function here is a pure transformation of its input and options.
//! Anything that cannot be formatted comes back as `None` (or the documented
//! zero value) rather than an error.

mod dates;
mod money;
mod numeric;
mod phone;
mod random;
mod words;

pub use dates::{
    first_day_of_month, first_day_of_week, format_date, last_day_of_month, last_day_of_week,
    parse_date, relative_interval, relative_interval_str, time_between, BetweenUnit,
    IntervalUnit, RelativeInterval,
};
pub use money::{format_percent, money, percent, MoneyFormat, NegativeStyle};
pub use numeric::numeric;
pub use phone::{phone, postal_code, PhoneFormat};
pub use random::random_string;
pub use words::{
    bool_to_str, list_to_html, list_to_string, lower_unless_acronym, name, number_suffix, plural,
    pluralize, pluralize_message, selected, slug, title, with_article,
};
