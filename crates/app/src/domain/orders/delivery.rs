//! Delivery and payment metadata.

use std::{fmt, str::FromStr};

use jiff::SignedDuration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($value => Ok(Self::$variant),)+
                    other => Err(UnknownVariant::new($kind, other)),
                }
            }
        }
    };
}

string_enum! {
    /// How the order reaches the customer.
    DeliveryMethod, "delivery method" {
        Pickup => "pickup",
        Courier => "courier",
    }
}

string_enum! {
    /// How the customer pays.
    PaymentMethod, "payment method" {
        Card => "card",
        Cash => "cash",
    }
}

string_enum! {
    PaymentStatus, "payment status" {
        Paid => "paid",
        Waiting => "waiting",
    }
}

string_enum! {
    DeliveryStatus, "delivery status" {
        InProcess => "in_process",
        OnTheWay => "on_the_way",
        Delivered => "delivered",
    }
}

/// How long before the delivery date the reminder goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLead {
    OneHour,
    SixHours,
    OneDay,
}

impl NotificationLead {
    #[must_use]
    pub fn hours(self) -> i16 {
        match self {
            Self::OneHour => 1,
            Self::SixHours => 6,
            Self::OneDay => 24,
        }
    }

    #[must_use]
    pub fn duration(self) -> SignedDuration {
        SignedDuration::from_hours(i64::from(self.hours()))
    }
}

impl TryFrom<i16> for NotificationLead {
    type Error = UnknownVariant;

    fn try_from(hours: i16) -> Result<Self, Self::Error> {
        match hours {
            1 => Ok(Self::OneHour),
            6 => Ok(Self::SixHours),
            24 => Ok(Self::OneDay),
            other => Err(UnknownVariant::new("notification lead", &other.to_string())),
        }
    }
}

impl FromStr for NotificationLead {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i16>()
            .ok()
            .and_then(|hours| Self::try_from(hours).ok())
            .ok_or_else(|| UnknownVariant::new("notification lead", s))
    }
}

impl fmt::Display for NotificationLead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.hours())
    }
}
