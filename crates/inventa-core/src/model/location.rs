// SPDX-License-Identifier: BUSL-1.1
//! Areas, sites, site types, municipalities, and centers.

use crate::identity::RecordId;

resource! {
    /// An organisational area.
    Area => Area, NewArea, AreaPatch {
        nombre: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        descripcion: Option<String>,
    }
}

resource! {
    /// A physical site where inventory is held.
    Site => Site, NewSite, SitePatch {
        nombre: String,
        tipo_sitio_id: RecordId,
        centro_id: RecordId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        area_id: Option<RecordId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        direccion: Option<String>,
    }
}

resource! {
    /// Classification of a site (warehouse, office, classroom, ...).
    SiteType => SiteType, NewSiteType, SiteTypePatch {
        nombre: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        descripcion: Option<String>,
    }
}

resource! {
    Municipality => Municipality, NewMunicipality, MunicipalityPatch {
        nombre: String,
        /// Official municipal code, when known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        codigo: Option<String>,
    }
}

resource! {
    /// A center grouping sites within one municipality.
    Center => Center, NewCenter, CenterPatch {
        nombre: String,
        municipio_id: RecordId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        direccion: Option<String>,
    }
}
