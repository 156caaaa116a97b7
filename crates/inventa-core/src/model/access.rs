// SPDX-License-Identifier: BUSL-1.1
//! Users, roles, permissions, modules, and programs.

use crate::identity::RecordId;
use crate::model::default_true;

resource! {
    /// An application user.
    User => User, NewUser, UserPatch {
        nombre: String,
        correo: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rol_id: Option<RecordId>,
        #[serde(default = "default_true")]
        activo: bool,
    }
}

resource! {
    Role => Role, NewRole, RolePatch {
        nombre: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        descripcion: Option<String>,
    }
}

resource! {
    /// A permission on one module, optionally scoped to a role.
    Permission => Permission, NewPermission, PermissionPatch {
        nombre: String,
        modulo_id: RecordId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rol_id: Option<RecordId>,
    }
}

resource! {
    /// An application module (a navigable section of the UI).
    Module => Module, NewModule, ModulePatch {
        nombre: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ruta: Option<String>,
    }
}

resource! {
    Program => Program, NewProgram, ProgramPatch {
        nombre: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        area_id: Option<RecordId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        descripcion: Option<String>,
    }
}
