//! Local keyword rules answered without contacting the remote model.
//!
//! A rule matches when every one of its keywords occurs in the lowercased
//! user text. Rules are checked in table order and the first match wins.

use once_cell::sync::Lazy;

#[derive(Clone, Debug, PartialEq)]
pub struct FallbackRule {
    keywords: Vec<String>,
    reply: String,
}

impl FallbackRule {
    pub fn new<I, S>(keywords: I, reply: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            reply: reply.into(),
        }
    }

    pub fn reply(&self) -> &str {
        &self.reply
    }

    /// `text` must already be lowercased.
    fn matches(&self, text: &str) -> bool {
        !self.keywords.is_empty() && self.keywords.iter().all(|k| text.contains(k.as_str()))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleTable {
    rules: Vec<FallbackRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<FallbackRule>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: FallbackRule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn match_text(&self, text: &str) -> Option<&str> {
        let text = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&text))
            .map(FallbackRule::reply)
    }

    /// Built-in hospital front-desk rules, shared for the whole process.
    pub fn hospital_defaults() -> &'static RuleTable {
        &DEFAULT_RULES
    }
}

pub const EMERGENCY_REPLY: &str = "If this is a medical emergency, call 112 (or your local emergency number) right away or go to the nearest emergency department. Our emergency wing is open 24/7.";
pub const BOOKING_REPLY: &str = "You can book an appointment from the Book Appointment page: choose a hospital, pick a doctor, then select a date and time slot. You'll get a confirmation once it is booked.";
pub const APPOINTMENT_REPLY: &str = "You can view, reschedule, or cancel your appointments from your dashboard under \"My Appointments\".";
pub const PAYMENT_REPLY: &str = "We accept cards, UPI, net banking, and cash at the billing counter. Online payments can be made from your dashboard after an appointment is confirmed.";
pub const BILLING_REPLY: &str = "Your bills and invoices are listed in your dashboard. For questions about a specific bill, contact the billing desk at the hospital.";
pub const INSURANCE_REPLY: &str = "Most major insurance providers are accepted. Please bring your insurance card and a photo ID to the front desk so we can verify your coverage.";
pub const MEDICINE_REPLY: &str = "For questions about a specific medicine, please consult your doctor or our in-house pharmacist. Never change a dose without medical advice.";
pub const PHARMACY_REPLY: &str = "Our in-house pharmacy is open 24/7 and can fill prescriptions from any of our doctors.";
pub const DOCTOR_REPLY: &str = "You can browse doctors by hospital and specialty on the Hospitals page, and book directly with any listed doctor.";
pub const HOURS_REPLY: &str = "Outpatient visiting hours are 9:00 AM to 8:00 PM every day. Emergency services are available around the clock.";
pub const CONTACT_REPLY: &str = "You can reach us through the Contact page, or call the hospital front desk. We usually respond to messages within one business day.";

static DEFAULT_RULES: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::new(vec![
        FallbackRule::new(["emergency"], EMERGENCY_REPLY),
        FallbackRule::new(["book", "appointment"], BOOKING_REPLY),
        FallbackRule::new(["appointment"], APPOINTMENT_REPLY),
        FallbackRule::new(["payment"], PAYMENT_REPLY),
        FallbackRule::new(["bill"], BILLING_REPLY),
        FallbackRule::new(["insurance"], INSURANCE_REPLY),
        FallbackRule::new(["medicine"], MEDICINE_REPLY),
        FallbackRule::new(["pharmacy"], PHARMACY_REPLY),
        FallbackRule::new(["doctor"], DOCTOR_REPLY),
        FallbackRule::new(["visiting hours"], HOURS_REPLY),
        FallbackRule::new(["contact"], CONTACT_REPLY),
    ])
});

/// What the built-in rules can still help with when the model is offline.
pub fn available_capabilities() -> &'static str {
    "booking appointments, emergencies, payments and billing, medicines, or finding a doctor"
}
