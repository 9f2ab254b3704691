//! Declarative request-body validation.
//!
//! Each route declares an ordered chain of per-field rules; the chain is plain
//! data evaluated by one generic evaluator. Rules trim their field first, so
//! handlers downstream observe sanitized values. Every rule in the chain is
//! evaluated, but only the first failure's message is surfaced to the client.

use lazy_regex::{lazy_regex, Lazy, Regex};
use serde_json::Value;

static EMAIL_REGEX: Lazy<Regex> =
    lazy_regex!(r"^[A-Za-z0-9][A-Za-z0-9._%+-]*@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$");

/// Check applied to a single string field.
#[derive(Debug, Clone, Copy)]
pub enum RuleKind {
    /// At least this many characters
    MinLen(usize),
    /// ASCII letters and digits only
    Alphanumeric,
    /// Non-empty after trimming
    NotEmpty,
    /// Syntactically valid email address
    Email,
}

impl RuleKind {
    fn check(&self, value: &str) -> bool {
        match self {
            RuleKind::MinLen(min) => value.chars().count() >= *min,
            RuleKind::Alphanumeric => {
                !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
            }
            RuleKind::NotEmpty => !value.is_empty(),
            RuleKind::Email => EMAIL_REGEX.is_match(value),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub trim: bool,
    pub kind: RuleKind,
    pub message: &'static str,
}

/// An ordered list of field rules evaluated against a JSON object body.
#[derive(Debug)]
pub struct RuleChain {
    rules: &'static [FieldRule],
}

impl RuleChain {
    pub const fn new(rules: &'static [FieldRule]) -> Self {
        Self { rules }
    }

    /// Trim declared fields in place, then evaluate every rule. Returns the
    /// first failing rule's message, if any. A missing or non-string field
    /// fails its rules.
    pub fn apply(&self, body: &mut Value) -> Result<(), &'static str> {
        let Value::Object(fields) = body else {
            return Err("request body must be a JSON object");
        };

        let mut first_failure = None;
        for rule in self.rules {
            if rule.trim {
                if let Some(Value::String(s)) = fields.get_mut(rule.field) {
                    *s = s.trim().to_string();
                }
            }

            let passed = match fields.get(rule.field) {
                Some(Value::String(s)) => rule.kind.check(s),
                _ => false,
            };
            if !passed && first_failure.is_none() {
                first_failure = Some(rule.message);
            }
        }

        match first_failure {
            None => Ok(()),
            Some(message) => Err(message),
        }
    }
}

const USERID_MIN_LEN: FieldRule = FieldRule {
    field: "userid",
    trim: true,
    kind: RuleKind::MinLen(4),
    message: "userid must be at least 4 characters",
};

const USERID_CHARSET: FieldRule = FieldRule {
    field: "userid",
    trim: true,
    kind: RuleKind::Alphanumeric,
    message: "userid may only contain letters and digits",
};

const PASSWORD_MIN_LEN: FieldRule = FieldRule {
    field: "password",
    trim: true,
    kind: RuleKind::MinLen(4),
    message: "password must be at least 4 characters",
};

/// Login: userid + password.
pub static LOGIN_CHAIN: RuleChain =
    RuleChain::new(&[USERID_MIN_LEN, USERID_CHARSET, PASSWORD_MIN_LEN]);

/// Signup: the login rules plus name and email.
pub static SIGNUP_CHAIN: RuleChain = RuleChain::new(&[
    USERID_MIN_LEN,
    USERID_CHARSET,
    PASSWORD_MIN_LEN,
    FieldRule {
        field: "name",
        trim: true,
        kind: RuleKind::NotEmpty,
        message: "name is required",
    },
    FieldRule {
        field: "email",
        trim: true,
        kind: RuleKind::Email,
        message: "email must be a valid email address",
    },
]);

/// Post create/update: text only.
pub static POST_CHAIN: RuleChain = RuleChain::new(&[FieldRule {
    field: "text",
    trim: true,
    kind: RuleKind::MinLen(4),
    message: "text must be at least 4 characters",
}]);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_signup_passes() {
        let mut body = json!({
            "userid": "abcd",
            "password": "1234",
            "name": "A",
            "email": "a@b.com",
        });
        assert!(SIGNUP_CHAIN.apply(&mut body).is_ok());
    }

    #[test]
    fn short_userid_fails_with_its_message() {
        let mut body = json!({
            "userid": "ab",
            "password": "1234",
            "name": "A",
            "email": "a@b.com",
        });
        assert_eq!(
            SIGNUP_CHAIN.apply(&mut body),
            Err("userid must be at least 4 characters")
        );
    }

    #[test]
    fn symbolic_userid_fails() {
        let mut body = json!({ "userid": "ab_cd", "password": "1234" });
        assert_eq!(
            LOGIN_CHAIN.apply(&mut body),
            Err("userid may only contain letters and digits")
        );
    }

    #[test]
    fn first_failure_wins() {
        // Both userid and password are invalid; the userid rule is declared first
        let mut body = json!({ "userid": "a!", "password": "12" });
        assert_eq!(
            LOGIN_CHAIN.apply(&mut body),
            Err("userid must be at least 4 characters")
        );
    }

    #[test]
    fn fields_are_trimmed_in_place() {
        let mut body = json!({ "userid": "  abcd  ", "password": " 1234 " });
        assert!(LOGIN_CHAIN.apply(&mut body).is_ok());
        assert_eq!(body["userid"], "abcd");
        assert_eq!(body["password"], "1234");
    }

    #[test]
    fn whitespace_padding_does_not_satisfy_min_len() {
        let mut body = json!({ "text": "  ab  " });
        assert_eq!(
            POST_CHAIN.apply(&mut body),
            Err("text must be at least 4 characters")
        );
    }

    #[test]
    fn missing_field_fails_its_rule() {
        let mut body = json!({ "userid": "abcd" });
        assert_eq!(
            LOGIN_CHAIN.apply(&mut body),
            Err("password must be at least 4 characters")
        );
    }

    #[test]
    fn non_string_field_fails_its_rule() {
        let mut body = json!({ "userid": 1234, "password": "1234" });
        assert_eq!(
            LOGIN_CHAIN.apply(&mut body),
            Err("userid must be at least 4 characters")
        );
    }

    #[test]
    fn non_object_body_is_rejected() {
        let mut body = json!([1, 2, 3]);
        assert!(LOGIN_CHAIN.apply(&mut body).is_err());
    }

    #[test]
    fn empty_name_fails() {
        let mut body = json!({
            "userid": "abcd",
            "password": "1234",
            "name": "   ",
            "email": "a@b.com",
        });
        assert_eq!(SIGNUP_CHAIN.apply(&mut body), Err("name is required"));
    }

    #[test]
    fn email_rule_accepts_and_rejects() {
        for good in ["a@b.com", "user.name+tag@gmail.com", "info@sub.domain.org"] {
            let mut body = json!({
                "userid": "abcd", "password": "1234", "name": "A", "email": good,
            });
            assert!(SIGNUP_CHAIN.apply(&mut body).is_ok(), "expected valid: {good}");
        }
        for bad in ["not-an-email", "a@b", "@b.com", "a b@c.com"] {
            let mut body = json!({
                "userid": "abcd", "password": "1234", "name": "A", "email": bad,
            });
            assert_eq!(
                SIGNUP_CHAIN.apply(&mut body),
                Err("email must be a valid email address"),
                "expected invalid: {bad}"
            );
        }
    }
}
