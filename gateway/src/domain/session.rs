use std::fmt;

// Keys under which the session is persisted in durable storage.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const ROLE_KEY: &str = "user_rol";

// Client-held credentials for the logged-in user.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub role: Role,
}

// Tokens are bearer secrets; keep them out of debug output and logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

// Role string issued by the backend as `usuario_rol`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Alumno,
    Profesor,
    ProfesorJefe,
    ProfesorAsistente,
    SuperAdmin,
    // Roles the backend may add later are preserved verbatim.
    Other(String),
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value {
            "alumno" => Role::Alumno,
            "profesor" => Role::Profesor,
            "profesor_jefe" => Role::ProfesorJefe,
            "profesor_asistente" => Role::ProfesorAsistente,
            "superadmin" => Role::SuperAdmin,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Alumno => "alumno",
            Role::Profesor => "profesor",
            Role::ProfesorJefe => "profesor_jefe",
            Role::ProfesorAsistente => "profesor_asistente",
            Role::SuperAdmin => "superadmin",
            Role::Other(value) => value,
        }
    }

    pub fn is_student(&self) -> bool {
        matches!(self, Role::Alumno)
    }

    pub fn is_teacher(&self) -> bool {
        matches!(
            self,
            Role::Profesor | Role::ProfesorJefe | Role::ProfesorAsistente
        )
    }

    pub fn is_superadmin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    // Screen a freshly logged-in user lands on.
    pub fn landing_route(&self) -> &'static str {
        if self.is_teacher() || self.is_superadmin() {
            "/control-panel"
        } else {
            "/home"
        }
    }

    // Exact-match guard used for role-restricted areas.
    pub fn can_access(&self, required: Option<&Role>) -> bool {
        match required {
            Some(required) => self == required,
            None => true,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_role_string_is_known_then_parse_round_trips_through_as_str() {
        for raw in [
            "alumno",
            "profesor",
            "profesor_jefe",
            "profesor_asistente",
            "superadmin",
        ] {
            assert_eq!(Role::parse(raw).as_str(), raw);
        }
    }

    #[test]
    fn when_role_string_is_unknown_then_it_is_preserved() {
        let role = Role::parse("apoderado");

        assert_eq!(role, Role::Other("apoderado".to_string()));
        assert_eq!(role.to_string(), "apoderado");
        assert!(!role.is_student());
        assert!(!role.is_teacher());
    }

    #[test]
    fn when_role_is_any_teacher_variant_then_lands_on_control_panel() {
        assert_eq!(Role::Profesor.landing_route(), "/control-panel");
        assert_eq!(Role::ProfesorJefe.landing_route(), "/control-panel");
        assert_eq!(Role::ProfesorAsistente.landing_route(), "/control-panel");
        assert_eq!(Role::SuperAdmin.landing_route(), "/control-panel");
    }

    #[test]
    fn when_role_is_student_or_unknown_then_lands_on_home() {
        assert_eq!(Role::Alumno.landing_route(), "/home");
        assert_eq!(Role::parse("visita").landing_route(), "/home");
    }

    #[test]
    fn when_required_role_differs_then_access_is_denied() {
        assert!(Role::Alumno.can_access(None));
        assert!(Role::Alumno.can_access(Some(&Role::Alumno)));
        assert!(!Role::Profesor.can_access(Some(&Role::SuperAdmin)));
    }

    #[test]
    fn when_session_is_debug_formatted_then_tokens_are_redacted() {
        let session = Session {
            access_token: "A1".to_string(),
            refresh_token: "R1".to_string(),
            role: Role::Alumno,
        };

        let printed = format!("{session:?}");

        assert!(!printed.contains("A1"));
        assert!(!printed.contains("R1"));
        assert!(printed.contains("Alumno"));
    }
}
