use apiform_core::{
    codegen::{Artifact, ArtifactKind, Code, Generator, GeneratorContext, GeneratorKind},
    signature::{CallArgument, Signature},
};
use indoc::formatdoc;
use itertools::Itertools;

use super::{
    emit::{TsModule, jsdoc, param_list, string_lit},
    naming::{CodegenTypeName, arguments, parameters, suffixed_name, type_imports},
};

/// Generates `queries.ts`: a server-side fetcher for every endpoint.
///
/// Queries go through `unstable_cache`, tagged with their category and
/// domain tags, so that server actions can revalidate them. Mutations
/// are never cached.
pub struct CodegenQueries<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> CodegenQueries<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }

    fn query(&self, sig: &Signature<'_>) -> String {
        let call = format!("serverClient.{}({})", sig.name, arguments(sig));
        let body = if sig.is_query() {
            let args = sig.call_arguments();
            let key = [string_lit(sig.category.as_str()), string_lit(sig.name)]
                .into_iter()
                .chain((!args.is_empty()).then(|| {
                    format!(
                        "JSON.stringify([{}])",
                        args.iter().copied().map(CallArgument::name).join(", ")
                    )
                }))
                .join(", ");
            let tags = std::iter::once(sig.category.as_str())
                .chain(sig.invalidation_tags())
                .map(string_lit)
                .join(", ");
            let cached = formatdoc! {"
                return unstable_cache(
                  () => {call},
                  [{key}],
                  {{ tags: [{tags}] }},
                )();
            "};
            textwrap::indent(&cached, "  ")
        } else {
            format!("  return {call};\n")
        };
        formatdoc! {"
            {doc}export async function {name}{params}: Promise<{response}> {{
            {body}}}",
            doc = jsdoc("", sig.endpoint.description.as_deref(), &sig.endpoint.tags),
            name = suffixed_name(sig, &self.cx.options().query_suffix),
            params = param_list(&parameters(sig)),
            response = CodegenTypeName::Response(sig.name),
        }
    }
}

impl Code for CodegenQueries<'_> {
    fn path(&self) -> &str {
        ArtifactKind::Queries.file_name()
    }

    fn into_string(self) -> String {
        let sigs = self.cx.signatures().collect_vec();
        let caches = sigs.iter().any(|sig| sig.is_query());

        let mut module = TsModule::new(self.cx, ArtifactKind::Queries);
        module
            .import(caches.then_some("unstable_cache"), "next/cache")
            .import(["serverClient"], ArtifactKind::ServerClient.module())
            .import_type(type_imports(sigs.iter().copied()), ArtifactKind::Types.module());
        for sig in &sigs {
            module.item(self.query(sig));
        }
        module.into_string()
    }
}

/// Emits `queries.ts`.
#[derive(Clone, Copy, Debug)]
pub struct ServerQueriesGenerator<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> ServerQueriesGenerator<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }
}

impl Generator for ServerQueriesGenerator<'_> {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::ServerQueries
    }

    fn artifacts(&self) -> Vec<Artifact> {
        vec![Artifact::from_code(
            ArtifactKind::Queries,
            CodegenQueries::new(self.cx),
        )]
    }
}
