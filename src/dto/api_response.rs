use serde::Serialize;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Respuesta sin datos, p.ej. tras un borrado
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Paginación común de los listados
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 200;

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).clamp(1, Self::MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_bounds() {
        let page = Pagination { limit: None, offset: None };
        assert_eq!(page.limit(), 50);
        assert_eq!(page.offset(), 0);

        let page = Pagination { limit: Some(10_000), offset: Some(-3) };
        assert_eq!(page.limit(), 200);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_success_envelope() {
        let body = serde_json::to_value(ApiResponse::success_with_message(7, "ok")).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], 7);
        assert_eq!(body["message"], "ok");
    }
}
