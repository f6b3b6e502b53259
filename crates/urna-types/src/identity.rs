//! Identity types: the result of a cédula lookup and its display projection.
//!
//! The lookup service owns the shape of the returned record. The client
//! treats it as opaque JSON except for the handful of profile fields used to
//! decide "found vs not found" and to build an [`IdentitySummary`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Record fields whose presence marks a lookup response as a real profile.
pub const PROFILE_FIELDS: &[&str] = &[
    "nombreCompleto",
    "nombre",
    "cedula",
    "descripcionProvincia",
    "descripcionCanton",
    "descripcionDistrito",
    "nombreCentroVotacion",
    "junta",
];

/// A successfully resolved identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// The identifier exactly as submitted (trimmed).
    pub cedula: String,
    /// Service-returned profile, stored verbatim.
    pub record: Value,
}

impl Identity {
    pub fn new(cedula: impl Into<String>, record: Value) -> Self {
        Self {
            cedula: cedula.into(),
            record,
        }
    }

    /// The profile object inside the record, after unwrapping `d` / `lista`.
    pub fn profile(&self) -> Option<&Map<String, Value>> {
        normalized_profile(&self.record)
    }

    pub fn summary(&self) -> IdentitySummary {
        IdentitySummary::from_identity(self)
    }
}

/// Unwrap the lookup envelope down to the profile object.
///
/// Responses come either bare, wrapped in `d`, or with the profile nested in
/// a `lista` member (object, or a list whose first element is the profile).
pub fn normalized_profile(record: &Value) -> Option<&Map<String, Value>> {
    let data = match record.get("d") {
        Some(inner) if is_truthy(inner) => inner,
        _ => record,
    };

    let data = match data.get("lista") {
        Some(Value::Array(items)) => items.first().unwrap_or(data),
        Some(inner) if is_truthy(inner) => inner,
        _ => data,
    };

    data.as_object()
}

/// Whether a normalized profile carries at least one non-null profile field.
pub fn is_profile(profile: &Map<String, Value>) -> bool {
    PROFILE_FIELDS
        .iter()
        .any(|field| profile.get(*field).is_some_and(|v| !v.is_null()))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Outcome of a lookup round trip that reached the service.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(Identity),
    NotFound,
}

impl LookupOutcome {
    /// Classify a decoded 2xx response body for the given cédula.
    ///
    /// A body that is not an object, or whose normalized profile has no
    /// profile-shaped field, is `NotFound`.
    pub fn classify(cedula: &str, body: Value) -> Self {
        if !body.is_object() {
            return LookupOutcome::NotFound;
        }
        match normalized_profile(&body) {
            Some(profile) if is_profile(profile) => {
                LookupOutcome::Found(Identity::new(cedula, body))
            }
            _ => LookupOutcome::NotFound,
        }
    }
}

/// The identity attached to a logged-in session.
///
/// Persists as the `userData` JSON object: `{"is_guest": true}` for guests,
/// `{"cedula": ..., "tse_data": ...}` for identified users. The same object is
/// sent to the answering service as `user_context`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum SessionIdentity {
    /// The user explicitly declined to identify.
    Guest,
    Identified(Identity),
}

impl SessionIdentity {
    pub fn is_guest(&self) -> bool {
        matches!(self, SessionIdentity::Guest)
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionIdentity::Guest => None,
            SessionIdentity::Identified(identity) => Some(identity),
        }
    }

    /// Display summary; guests have none.
    pub fn summary(&self) -> Option<IdentitySummary> {
        self.identity().map(Identity::summary)
    }

    /// The persisted / wire `userData` object.
    pub fn to_user_data(&self) -> Value {
        match self {
            SessionIdentity::Guest => json!({ "is_guest": true }),
            SessionIdentity::Identified(identity) => json!({
                "cedula": identity.cedula,
                "tse_data": identity.record,
            }),
        }
    }
}

impl From<SessionIdentity> for Value {
    fn from(identity: SessionIdentity) -> Self {
        identity.to_user_data()
    }
}

impl TryFrom<Value> for SessionIdentity {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut obj) = value else {
            return Err("user data is not a JSON object".to_string());
        };

        if obj.get("is_guest").and_then(Value::as_bool) == Some(true) {
            return Ok(SessionIdentity::Guest);
        }

        let cedula = match obj.remove("cedula") {
            Some(Value::String(cedula)) => cedula,
            _ => return Err("user data has no cedula".to_string()),
        };
        let record = obj
            .remove("tse_data")
            .ok_or_else(|| "user data has no tse_data".to_string())?;

        Ok(SessionIdentity::Identified(Identity::new(cedula, record)))
    }
}

/// Display projection of an identity record (the "where do I vote" panel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentitySummary {
    pub cedula: String,
    pub nombre: String,
    pub provincia: String,
    pub canton: String,
    pub distrito: String,
    pub centro: String,
    pub junta: String,
}

impl IdentitySummary {
    /// Placeholder for any missing field.
    pub const UNKNOWN: &'static str = "N/A";
    /// Name shown when the record carries none.
    pub const DEFAULT_NAME: &'static str = "Ciudadano";

    pub fn from_identity(identity: &Identity) -> Self {
        let profile = identity.profile();
        let text = |key: &str| field_text(profile, key);
        let or_unknown = |key: &str| text(key).unwrap_or_else(|| Self::UNKNOWN.to_string());

        let cedula = text("cedula")
            .or_else(|| (!identity.cedula.is_empty()).then(|| identity.cedula.clone()))
            .unwrap_or_else(|| Self::UNKNOWN.to_string());

        Self {
            cedula,
            nombre: text("nombreCompleto").unwrap_or_else(|| Self::DEFAULT_NAME.to_string()),
            provincia: or_unknown("descripcionProvincia"),
            canton: or_unknown("descripcionCanton"),
            distrito: or_unknown("descripcionDistrito"),
            centro: or_unknown("nombreCentroVotacion"),
            junta: or_unknown("junta"),
        }
    }
}

fn field_text(profile: Option<&Map<String, Value>>, key: &str) -> Option<String> {
    match profile?.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl fmt::Display for IdentitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nombre: {} | Cédula: {}", self.nombre, self.cedula)?;
        writeln!(
            f,
            "Provincia: {} | Cantón: {} | Distrito: {}",
            self.provincia, self.canton, self.distrito
        )?;
        write!(f, "Centro: {} - Junta: {}", self.centro, self.junta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tse_record() -> Value {
        json!({
            "d": {
                "lista": {
                    "cedula": "206440798",
                    "nombreCompleto": "ANA MORA SOLIS",
                    "descripcionProvincia": "ALAJUELA",
                    "descripcionCanton": "SAN RAMON",
                    "descripcionDistrito": "SANTIAGO",
                    "nombreCentroVotacion": "ESCUELA JOSE MARIA ZELEDON",
                    "junta": 1234
                }
            }
        })
    }

    #[test]
    fn test_normalized_profile_unwraps_d_and_lista() {
        let record = tse_record();
        let profile = normalized_profile(&record).unwrap();
        assert_eq!(profile["nombreCompleto"], "ANA MORA SOLIS");
    }

    #[test]
    fn test_normalized_profile_bare_record() {
        let record = json!({ "nombre": "ANA" });
        let profile = normalized_profile(&record).unwrap();
        assert_eq!(profile["nombre"], "ANA");
    }

    #[test]
    fn test_normalized_profile_null_d_falls_back_to_record() {
        let record = json!({ "d": null, "cedula": "1" });
        let profile = normalized_profile(&record).unwrap();
        assert_eq!(profile["cedula"], "1");
    }

    #[test]
    fn test_normalized_profile_lista_array_uses_first() {
        let record = json!({ "lista": [{ "junta": "7" }, { "junta": "8" }] });
        let profile = normalized_profile(&record).unwrap();
        assert_eq!(profile["junta"], "7");
    }

    #[test]
    fn test_classify_found() {
        let outcome = LookupOutcome::classify("206440798", tse_record());
        match outcome {
            LookupOutcome::Found(identity) => {
                assert_eq!(identity.cedula, "206440798");
                assert_eq!(identity.record, tse_record());
            }
            LookupOutcome::NotFound => panic!("expected Found"),
        }
    }

    #[test]
    fn test_classify_not_found_shapes() {
        assert_eq!(LookupOutcome::classify("1", json!({})), LookupOutcome::NotFound);
        assert_eq!(LookupOutcome::classify("1", json!({ "d": null })), LookupOutcome::NotFound);
        assert_eq!(
            LookupOutcome::classify("1", json!({ "d": { "lista": null, "mensaje": "x" } })),
            LookupOutcome::NotFound
        );
        assert_eq!(LookupOutcome::classify("1", json!({ "nombre": null })), LookupOutcome::NotFound);
        assert_eq!(LookupOutcome::classify("1", json!("ok")), LookupOutcome::NotFound);
        assert_eq!(LookupOutcome::classify("1", json!([1, 2])), LookupOutcome::NotFound);
    }

    #[test]
    fn test_summary_reads_profile_fields() {
        let summary = Identity::new("206440798", tse_record()).summary();
        assert_eq!(summary.nombre, "ANA MORA SOLIS");
        assert_eq!(summary.provincia, "ALAJUELA");
        assert_eq!(summary.canton, "SAN RAMON");
        assert_eq!(summary.distrito, "SANTIAGO");
        assert_eq!(summary.centro, "ESCUELA JOSE MARIA ZELEDON");
        assert_eq!(summary.junta, "1234");
    }

    #[test]
    fn test_summary_fallbacks() {
        let summary = Identity::new("111", json!({ "descripcionProvincia": "CARTAGO" })).summary();
        assert_eq!(summary.cedula, "111");
        assert_eq!(summary.nombre, IdentitySummary::DEFAULT_NAME);
        assert_eq!(summary.provincia, "CARTAGO");
        assert_eq!(summary.junta, IdentitySummary::UNKNOWN);
    }

    #[test]
    fn test_user_data_guest_shape() {
        let value = SessionIdentity::Guest.to_user_data();
        assert_eq!(value, json!({ "is_guest": true }));
        let parsed = SessionIdentity::try_from(value).unwrap();
        assert!(parsed.is_guest());
        assert!(parsed.summary().is_none());
    }

    #[test]
    fn test_user_data_identified_shape() {
        let identity = SessionIdentity::Identified(Identity::new("206440798", tse_record()));
        let json = serde_json::to_string(&identity).unwrap();
        let raw: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(raw["cedula"], "206440798");
        assert_eq!(raw["tse_data"], tse_record());

        let parsed: SessionIdentity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, identity);
    }

    #[test]
    fn test_user_data_rejects_unknown_shape() {
        assert!(SessionIdentity::try_from(json!({ "is_guest": false })).is_err());
        assert!(SessionIdentity::try_from(json!({ "cedula": "1" })).is_err());
        assert!(SessionIdentity::try_from(json!(42)).is_err());
    }
}
