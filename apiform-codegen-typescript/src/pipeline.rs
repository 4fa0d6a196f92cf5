use apiform_core::codegen::{
    GenerateError, Generator, GeneratorContext, GeneratorKind, RunReport, Writer,
    orchestrator::{self, select_generators, unmet_dependencies},
};

use super::{
    ClientGenerator, HooksGenerator, RuntimeGenerator, ServerActionsGenerator,
    ServerQueriesGenerator, TypesGenerator,
};

/// Returns the TypeScript generator for a kind.
pub fn generator_for<'a>(kind: GeneratorKind, cx: GeneratorContext<'a>) -> Box<dyn Generator + 'a> {
    match kind {
        GeneratorKind::Runtime => Box::new(RuntimeGenerator::new(cx)),
        GeneratorKind::Types => Box::new(TypesGenerator::new(cx)),
        GeneratorKind::Client => Box::new(ClientGenerator::new(cx)),
        GeneratorKind::Hooks => Box::new(HooksGenerator::new(cx)),
        GeneratorKind::ServerActions => Box::new(ServerActionsGenerator::new(cx)),
        GeneratorKind::ServerQueries => Box::new(ServerQueriesGenerator::new(cx)),
    }
}

/// Runs every generator that the configuration enables, in plan order,
/// and writes their artifacts.
///
/// Enabled generators whose dependencies are disabled still run, but
/// their artifacts import modules that this run won't write.
pub fn generate(cx: GeneratorContext<'_>, writer: &dyn Writer) -> Result<RunReport, GenerateError> {
    let kinds = select_generators(cx.config());
    for (kind, dep) in unmet_dependencies(&kinds) {
        tracing::warn!(
            generator = %kind,
            dependency = %dep,
            "generator is enabled, but a generator it depends on isn't",
        );
    }
    orchestrator::run(kinds.into_iter().map(|kind| generator_for(kind, cx)), writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{
        io,
        path::{Path, PathBuf},
    };

    use apiform_core::{
        codegen::MemoryWriter,
        parse::Document,
        registry::{Registry, RegistryError},
    };
    use indoc::indoc;
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use crate::tests::{Fixture, LOGOUT, NEXTJS, USERS, VITE, assert_matches};

    fn paths(writer: &MemoryWriter) -> Vec<String> {
        writer
            .paths()
            .iter()
            .map(|path| path.display().to_string())
            .collect_vec()
    }

    #[test]
    fn test_nextjs_write_order() {
        let fixture = Fixture::new(NEXTJS, USERS);
        let writer = MemoryWriter::new();
        let report = generate(fixture.cx(), &writer).unwrap();

        assert_eq!(report.len(), 7);
        assert_eq!(
            paths(&writer),
            [
                "runtime.ts",
                "types.ts",
                "client.ts",
                "server-client.ts",
                "hooks.ts",
                "actions.ts",
                "queries.ts",
            ]
        );
        assert_eq!(
            report.iter().map(|(kind, _)| kind).dedup().collect_vec(),
            [
                GeneratorKind::Runtime,
                GeneratorKind::Types,
                GeneratorKind::Client,
                GeneratorKind::Hooks,
                GeneratorKind::ServerActions,
                GeneratorKind::ServerQueries,
            ]
        );
    }

    #[test]
    fn test_generation_is_idempotent() {
        let fixture = Fixture::new(NEXTJS, USERS);
        let first = MemoryWriter::new();
        let second = MemoryWriter::new();
        generate(fixture.cx(), &first).unwrap();
        generate(fixture.cx(), &second).unwrap();

        assert_eq!(first.into_files(), second.into_files());
    }

    #[test]
    fn test_vite_never_gets_server_artifacts() {
        // Server actions and queries are turned on, but Vite can't
        // use them.
        let config = indoc! {r#"
            provider = "vite"
            endpoints = "endpoints.yaml"
            output = "generated"
            generate-server-actions = true
            generate-server-queries = true
        "#};
        let fixture = Fixture::new(config, USERS);
        let writer = MemoryWriter::new();
        generate(fixture.cx(), &writer).unwrap();

        assert_eq!(
            paths(&writer),
            ["runtime.ts", "types.ts", "client.ts", "hooks.ts"]
        );
    }

    #[test]
    fn test_disabled_hooks() {
        let config = format!("{VITE}generate-hooks = false\n");
        let fixture = Fixture::new(&config, USERS);
        let writer = MemoryWriter::new();
        generate(fixture.cx(), &writer).unwrap();

        assert_eq!(paths(&writer), ["runtime.ts", "types.ts", "client.ts"]);
    }

    #[test]
    fn test_disabled_client_still_runs_dependents() {
        let config = format!("{VITE}generate-client = false\n");
        let fixture = Fixture::new(&config, USERS);
        let writer = MemoryWriter::new();
        generate(fixture.cx(), &writer).unwrap();

        assert_eq!(paths(&writer), ["runtime.ts", "types.ts", "hooks.ts"]);
    }

    #[test]
    fn test_custom_imports_only_in_their_artifact() {
        let config = format!(
            "{NEXTJS}\n[options.custom-imports]\nhooks = ['import {{ toast }} from \"sonner\";']\n"
        );
        let fixture = Fixture::new(&config, USERS);
        let writer = MemoryWriter::new();
        generate(fixture.cx(), &writer).unwrap();

        for path in writer.paths() {
            let text = writer.get(&path).unwrap();
            assert_eq!(
                text.contains("from \"sonner\""),
                path == Path::new("hooks.ts"),
                "{}",
                path.display(),
            );
        }
    }

    #[test]
    fn test_zero_argument_endpoint_everywhere() {
        let fixture = Fixture::new(NEXTJS, LOGOUT);
        let writer = MemoryWriter::new();
        generate(fixture.cx(), &writer).unwrap();

        let file = |name: &str| writer.get(name).unwrap();
        assert!(file("client.ts").contains("  logout: () => Promise<LogoutResponse>;\n"));
        assert!(file("server-client.ts").contains("  logout: () => Promise<LogoutResponse>;\n"));
        assert!(file("hooks.ts").contains("mutationFn: () => apiClient.logout(),"));
        assert!(file("actions.ts").contains("export async function logoutAction(): "));
        assert!(file("queries.ts").contains("export async function logoutQuery(): "));
        assert!(file("queries.ts").contains("  return serverClient.logout();\n"));
        for (path, text) in writer.into_files() {
            assert!(!text.contains("logout(undefined"), "{}", path.display());
        }
    }

    #[test]
    fn test_failed_write_keeps_earlier_artifacts() {
        /// Refuses to write the hooks, and remembers everything else.
        struct RefuseHooks(MemoryWriter);

        impl Writer for RefuseHooks {
            fn write(&self, path: &Path, text: &str) -> io::Result<()> {
                if path == Path::new("hooks.ts") {
                    return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
                }
                self.0.write(path, text)
            }
        }

        let fixture = Fixture::new(NEXTJS, USERS);
        let writer = RefuseHooks(MemoryWriter::new());
        let result = generate(fixture.cx(), &writer);

        assert_matches!(
            result,
            Err(GenerateError::Write { kind: GeneratorKind::Hooks, ref path, .. })
                if path == &PathBuf::from("hooks.ts"),
        );
        assert_eq!(
            paths(&writer.0),
            ["runtime.ts", "types.ts", "client.ts", "server-client.ts"]
        );
    }

    #[test]
    fn test_duplicate_endpoint_rejected_before_generation() {
        let doc = Document::from_json(
            r#"{
                "endpoints": {
                    "getUser": { "path": "/users/:id", "method": "GET", "params": "IdSchema", "response": "UserSchema" },
                    "getUser": { "path": "/users", "method": "GET", "response": "UserSchema" }
                }
            }"#,
        )
        .unwrap();

        assert_matches!(
            Registry::from_doc(doc),
            Err(RegistryError::DuplicateEndpoint(ref name)) if name == "getUser",
        );
    }

    #[test]
    fn test_reserved_word_endpoint_names() {
        let fixture = Fixture::new(
            NEXTJS,
            indoc! {"
                baseUrl: https://api.example.com
                endpoints:
                  delete:
                    path: /items/:id
                    method: DELETE
                    params: ItemIdParamsSchema
                    response: SuccessSchema
                    tags: [items, mutation]
            "},
        );
        let writer = MemoryWriter::new();
        generate(fixture.cx(), &writer).unwrap();

        let file = |name: &str| writer.get(name).unwrap();
        assert!(file("types.ts").contains("export type DeleteParams = "));
        assert!(file("hooks.ts").contains("export function useDelete("));
        assert!(file("hooks.ts").contains("apiClient.delete(params)"));
        assert!(file("actions.ts").contains("export async function deleteAction("));
        assert!(file("queries.ts").contains("export async function deleteQuery("));
    }

    #[test]
    fn test_empty_registry() {
        let fixture = Fixture::new(VITE, "baseUrl: https://api.example.com\nendpoints: {}\n");
        let writer = MemoryWriter::new();
        generate(fixture.cx(), &writer).unwrap();

        let client = writer.get("client.ts").unwrap();
        assert!(client.contains("export type APIClientMethods = {};"));
        assert_eq!(
            paths(&writer),
            ["runtime.ts", "types.ts", "client.ts", "hooks.ts"]
        );
    }
}
