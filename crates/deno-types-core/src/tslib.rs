//! Names of the declaration libs TypeScript ships itself.
//!
//! The built-in-compatible rendering keeps `/// <reference lib="..." />`
//! for these so the consumer's own TypeScript install provides them.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{GenError, GenResult};

/// `lib.<name>.d.ts` files in the TypeScript 5.x `lib/` directory.
const TYPESCRIPT_LIB_NAMES: &[&str] = &[
    "decorators",
    "decorators.legacy",
    "dom",
    "dom.asynciterable",
    "dom.iterable",
    "es2015",
    "es2015.collection",
    "es2015.core",
    "es2015.generator",
    "es2015.iterable",
    "es2015.promise",
    "es2015.proxy",
    "es2015.reflect",
    "es2015.symbol",
    "es2015.symbol.wellknown",
    "es2016",
    "es2016.array.include",
    "es2016.full",
    "es2016.intl",
    "es2017",
    "es2017.arraybuffer",
    "es2017.date",
    "es2017.full",
    "es2017.intl",
    "es2017.object",
    "es2017.sharedmemory",
    "es2017.string",
    "es2017.typedarrays",
    "es2018",
    "es2018.asyncgenerator",
    "es2018.asynciterable",
    "es2018.full",
    "es2018.intl",
    "es2018.promise",
    "es2018.regexp",
    "es2019",
    "es2019.array",
    "es2019.full",
    "es2019.intl",
    "es2019.object",
    "es2019.string",
    "es2019.symbol",
    "es2020",
    "es2020.bigint",
    "es2020.date",
    "es2020.full",
    "es2020.intl",
    "es2020.number",
    "es2020.promise",
    "es2020.sharedmemory",
    "es2020.string",
    "es2020.symbol.wellknown",
    "es2021",
    "es2021.full",
    "es2021.intl",
    "es2021.promise",
    "es2021.string",
    "es2021.weakref",
    "es2022",
    "es2022.array",
    "es2022.error",
    "es2022.full",
    "es2022.intl",
    "es2022.object",
    "es2022.regexp",
    "es2022.string",
    "es2023",
    "es2023.array",
    "es2023.collection",
    "es2023.full",
    "es2023.intl",
    "es2024",
    "es2024.arraybuffer",
    "es2024.collection",
    "es2024.full",
    "es2024.object",
    "es2024.promise",
    "es2024.regexp",
    "es2024.sharedmemory",
    "es2024.string",
    "es5",
    "es6",
    "esnext",
    "esnext.array",
    "esnext.collection",
    "esnext.decorators",
    "esnext.disposable",
    "esnext.full",
    "esnext.intl",
    "esnext.iterator",
    "esnext.promise",
    "scripthost",
    "webworker",
    "webworker.asynciterable",
    "webworker.importscripts",
    "webworker.iterable",
];

/// Set of lib names resolvable by the host TypeScript compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeScriptLibs {
    names: BTreeSet<String>,
}

impl Default for TypeScriptLibs {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeScriptLibs {
    /// The list compiled into this crate.
    pub fn builtin() -> Self {
        Self::from_names(TYPESCRIPT_LIB_NAMES.iter().copied())
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Enumerate `lib.*.d.ts` files in an installed `typescript/lib` directory.
    pub fn from_dir(dir: &Path) -> GenResult<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| GenError::io(dir, e))?;

        let mut names = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| GenError::io(dir, e))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = file_name
                .strip_prefix("lib.")
                .and_then(|rest| rest.strip_suffix(".d.ts"))
            {
                names.insert(name.to_string());
            }
        }

        if names.is_empty() {
            return Err(GenError::Config {
                message: format!("no lib.*.d.ts files found in {}", dir.display()),
            });
        }

        Ok(Self { names })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_standard_libs() {
        let libs = TypeScriptLibs::builtin();
        assert!(libs.contains("es5"));
        assert!(libs.contains("dom.iterable"));
        assert!(libs.contains("esnext"));
        assert!(!libs.contains("deno.ns"));
        assert!(!libs.contains("deno.window"));
    }

    #[test]
    fn test_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        for file in ["lib.es5.d.ts", "lib.dom.d.ts", "tsc.js", "lib.d.ts"] {
            std::fs::write(dir.path().join(file), "").unwrap();
        }

        let libs = TypeScriptLibs::from_dir(dir.path()).unwrap();
        assert_eq!(libs.len(), 2);
        assert!(libs.contains("es5"));
        assert!(libs.contains("dom"));
    }

    #[test]
    fn test_from_empty_dir_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TypeScriptLibs::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, GenError::Config { .. }));
    }
}
