use apiform_core::{
    codegen::{Artifact, ArtifactKind, Code, Generator, GeneratorContext, GeneratorKind},
    signature::Signature,
};
use indoc::formatdoc;
use itertools::Itertools;

use super::{
    emit::{TsModule, jsdoc, param_list, string_lit},
    naming::{CodegenTypeName, arguments, parameters, suffixed_name, type_imports},
};

/// Generates `actions.ts`: a Next.js server action for every endpoint.
/// Mutations revalidate the cache tags of their domain groups.
pub struct CodegenActions<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> CodegenActions<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }

    fn action(&self, sig: &Signature<'_>) -> String {
        let call = format!("serverClient.{}({})", sig.name, arguments(sig));
        let tags = sig.invalidation_tags().collect_vec();
        let body = if sig.is_query() || tags.is_empty() {
            format!("  return {call};\n")
        } else {
            let revalidations = tags
                .iter()
                .format_with("", |tag, f| {
                    f(&format_args!("  revalidateTag({});\n", string_lit(tag)))
                });
            format!("  const result = await {call};\n{revalidations}  return result;\n")
        };
        formatdoc! {"
            {doc}export async function {name}{params}: Promise<{response}> {{
            {body}}}",
            doc = jsdoc("", sig.endpoint.description.as_deref(), &sig.endpoint.tags),
            name = suffixed_name(sig, &self.cx.options().action_suffix),
            params = param_list(&parameters(sig)),
            response = CodegenTypeName::Response(sig.name),
        }
    }
}

impl Code for CodegenActions<'_> {
    fn path(&self) -> &str {
        ArtifactKind::Actions.file_name()
    }

    fn into_string(self) -> String {
        let sigs = self.cx.signatures().collect_vec();
        let revalidates = sigs
            .iter()
            .any(|sig| !sig.is_query() && sig.invalidation_tags().next().is_some());

        let mut module = TsModule::new(self.cx, ArtifactKind::Actions);
        module
            .directive("use server")
            .import(revalidates.then_some("revalidateTag"), "next/cache")
            .import(["serverClient"], ArtifactKind::ServerClient.module())
            .import_type(type_imports(sigs.iter().copied()), ArtifactKind::Types.module());
        for sig in &sigs {
            module.item(self.action(sig));
        }
        module.into_string()
    }
}

/// Emits `actions.ts`.
#[derive(Clone, Copy, Debug)]
pub struct ServerActionsGenerator<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> ServerActionsGenerator<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }
}

impl Generator for ServerActionsGenerator<'_> {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::ServerActions
    }

    fn artifacts(&self) -> Vec<Artifact> {
        vec![Artifact::from_code(
            ArtifactKind::Actions,
            CodegenActions::new(self.cx),
        )]
    }
}
