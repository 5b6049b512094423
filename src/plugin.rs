//! Format description and capability registration, for hosts that load
//! importers as plugins.

use crate::element::ElementKind;
use itertools::Itertools as _;

/// How the host hands the grid location to the importer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FileDest {
    /// A single file name.
    FileName,
    /// A base name the importer derives file names from.
    BaseName,
    /// A directory.
    Folder,
}

/// What a host needs to know to offer this importer to its users.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatInfo {
    /// Group the format is registered under in the host.
    pub group: String,
    pub name: String,
    pub id: u32,
    pub file_dest: FileDest,
    /// File extensions, without the leading dot.
    pub extensions: Vec<String>,
}

impl FormatInfo {
    pub fn su2() -> Self {
        Self {
            group: String::from("GRDP"),
            name: String::from("SU2"),
            id: 390,
            file_dest: FileDest::FileName,
            extensions: vec![String::from("su2")],
        }
    }

    /// Whether `path` ends with one of the format's extensions, ignoring case.
    pub fn matches_extension(&self, path: &std::path::Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    }
}

impl Default for FormatInfo {
    fn default() -> Self {
        Self::su2()
    }
}

/// The host's table of importer capabilities.
pub trait CapabilityRegistry {
    /// Sets the value `name` of `group` to the enumeration `value`, a list
    /// of choices separated by `|`.
    fn assign_value_enum(
        &mut self,
        group: &str,
        name: &str,
        value: &str,
        create_if_missing: bool,
    ) -> bool;
}

/// Name of the capability listing the element kinds the importer produces.
pub const VALID_ELEMENTS: &str = "ValidElements";

/// `Bar|Tri|Quad|Tet|Pyramid|Wedge|Hex`
pub fn valid_elements() -> String {
    ElementKind::ALL.iter().map(|kind| kind.name()).join("|")
}

/// Publishes the importer's capabilities. Called once when the host loads
/// the importer.
pub fn register<C>(registry: &mut C, format: &FormatInfo) -> bool
where
    C: CapabilityRegistry + ?Sized,
{
    let elements = valid_elements();
    tracing::debug!(format = %format.name, %elements, "registering importer");
    registry.assign_value_enum(&format.group, VALID_ELEMENTS, &elements, true)
}

/// Counterpart of [register], called when the host unloads the importer.
/// There is nothing to release.
pub fn unregister(format: &FormatInfo) {
    tracing::debug!(format = %format.name, "unregistering importer");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    #[derive(Default)]
    struct Registry {
        values: HashMap<(String, String), String>,
        refuse: bool,
    }

    impl CapabilityRegistry for Registry {
        fn assign_value_enum(
            &mut self,
            group: &str,
            name: &str,
            value: &str,
            create_if_missing: bool,
        ) -> bool {
            let key = (group.to_owned(), name.to_owned());
            if self.refuse || (!create_if_missing && !self.values.contains_key(&key)) {
                return false;
            }
            self.values.insert(key, value.to_owned());
            true
        }
    }

    #[test]
    fn test_register() {
        let format = FormatInfo::su2();
        let mut registry = Registry::default();
        assert!(register(&mut registry, &format));
        let key = (String::from("GRDP"), String::from("ValidElements"));
        assert_eq!(registry.values[&key], "Bar|Tri|Quad|Tet|Pyramid|Wedge|Hex");
        unregister(&format);

        registry.refuse = true;
        assert!(!register(&mut registry, &format));
    }

    #[test]
    fn test_extension() {
        let format = FormatInfo::default();
        assert!(format.matches_extension(Path::new("wing/naca0012.su2")));
        assert!(format.matches_extension(Path::new("MESH.SU2")));
        assert!(!format.matches_extension(Path::new("mesh.cgns")));
        assert!(!format.matches_extension(Path::new("su2")));
    }
}
