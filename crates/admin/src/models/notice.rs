//! Blocking dialogs shown to the admin.
//!
//! Every user-initiated action (save, upload, create, delete) reports its
//! result as a [`Notice`] rendered as a modal. Destructive actions first ask
//! through a [`ConfirmDialog`].

use serde::{Deserialize, Serialize};

/// Severity of a notice; selects the modal's icon and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    /// CSS modifier used by the modal partial.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "modal--success",
            Self::Error => "modal--error",
        }
    }
}

/// A modal notice with a title and optional body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub text: Option<String>,
}

impl Notice {
    /// A success notice without body text.
    #[must_use]
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.into(),
            text: None,
        }
    }

    /// An error notice titled "Error".
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            text: Some(text.into()),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    /// Shown after a product was created or updated.
    #[must_use]
    pub fn product_saved() -> Self {
        Self::success("Producto guardado exitosamente")
    }

    /// Shown when saving a product failed.
    #[must_use]
    pub fn product_save_failed() -> Self {
        Self::error("Error guardando el producto")
    }

    /// Shown when an image upload failed.
    #[must_use]
    pub fn upload_failed() -> Self {
        Self::error("Error uploading images. Please try again.")
    }

    /// Shown when an image reorder was rejected.
    #[must_use]
    pub fn reorder_rejected() -> Self {
        Self::error("El nuevo orden de imágenes no coincide con las imágenes actuales.")
    }

    /// Shown after an administrator was deleted.
    #[must_use]
    pub fn administrator_deleted() -> Self {
        Self::success("El administrador ha sido eliminado.")
    }

    /// Shown when deleting an administrator failed.
    #[must_use]
    pub fn administrator_delete_failed() -> Self {
        Self::error("Hubo un problema al eliminar el administrador.")
    }

    /// Shown after an administrator was created.
    #[must_use]
    pub fn administrator_created() -> Self {
        Self::success("Administrador agregado exitosamente")
    }

    /// Shown when creating an administrator failed.
    #[must_use]
    pub fn administrator_create_failed() -> Self {
        Self::error("Hubo un problema al agregar el administrador.")
    }
}

/// A blocking yes/no dialog guarding a destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub title: &'static str,
    pub text: &'static str,
    pub confirm_label: &'static str,
    pub cancel_label: &'static str,
}

impl ConfirmDialog {
    /// Dialog shown before deleting an administrator.
    pub const DELETE_ADMINISTRATOR: Self = Self {
        title: "¿Estás seguro?",
        text: "No podrás revertir esto.",
        confirm_label: "Sí, eliminarlo",
        cancel_label: "Cancelar",
    };
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_notice_shape() {
        let notice = Notice::product_save_failed();
        assert!(notice.is_error());
        assert_eq!(notice.title, "Error");
        assert_eq!(notice.text.as_deref(), Some("Error guardando el producto"));
        assert_eq!(notice.kind.css_class(), "modal--error");
    }

    #[test]
    fn test_notice_survives_session_serialization() {
        let notice = Notice::administrator_deleted();
        let json = serde_json::to_string(&notice).unwrap();
        let back: Notice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, notice);
        assert!(json.contains("\"success\""));
    }
}
