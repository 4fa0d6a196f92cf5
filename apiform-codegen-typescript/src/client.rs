use apiform_core::codegen::{
    Artifact, ArtifactKind, Code, Generator, GeneratorContext, GeneratorKind,
};
use indoc::{formatdoc, indoc};
use itertools::Itertools;

use super::{
    emit::{TsModule, jsdoc},
    naming::{CodegenTypeName, parameters, type_imports},
};

const CLIENT: &str = indoc! {"
    export type APIClient = APIClientMethods & {
      refreshAuth: () => Promise<void>;
      updateAuthCallbacks: (callbacks: AuthCallbacks) => void;
    };

    /**
     * The shared client. Until `initializeAPIClient` runs, requests
     * are sent without credentials.
     */
    export let apiClient = createAPIClient(apiConfig) as unknown as APIClient;

    /**
     * Replaces `apiClient` with a client that authenticates requests.
     * Call this once, from your auth provider.
     *
     * @example
     * initializeAPIClient({
     *   getTokens: () => getStoredTokens(),
     *   onAuthError: () => router.push('/login'),
     *   onRefreshToken: () => refreshAccessToken(),
     * });
     */
    export function initializeAPIClient(authCallbacks: AuthCallbacks): APIClient {
      apiClient = createAPIClient(apiConfig, authCallbacks) as unknown as APIClient;
      return apiClient;
    }

    export { createAPIClient };
    export type { AuthCallbacks };
"};

const SERVER_CLIENT: &str = indoc! {"
    /**
     * Calls the API directly, without authentication. Use it in server
     * components, server actions, and route handlers.
     */
    export const serverClient = createAPIClient(
      apiConfig,
    ) as unknown as APIClientMethods;
"};

/// Formats the `APIClientMethods` type, with one method per endpoint.
/// Both clients declare it, so that neither imports the other.
fn methods_type(cx: GeneratorContext<'_>) -> String {
    let methods = cx
        .signatures()
        .map(|sig| {
            let doc = jsdoc("  ", sig.endpoint.description.as_deref(), &[]);
            formatdoc! {"
                {doc}  {name}: ({params}) => Promise<{response}>;
                ",
                name = sig.name,
                params = parameters(&sig).join(", "),
                response = CodegenTypeName::Response(sig.name),
            }
        })
        .collect_vec();
    if methods.is_empty() {
        return "export type APIClientMethods = {};".to_owned();
    }
    format!("export type APIClientMethods = {{\n{}}};", methods.join(""))
}

/// Generates `client.ts`: the shared, authenticated client for
/// client-side code.
pub struct CodegenClient<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> CodegenClient<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }
}

impl Code for CodegenClient<'_> {
    fn path(&self) -> &str {
        ArtifactKind::Client.file_name()
    }

    fn into_string(self) -> String {
        let mut module = TsModule::new(self.cx, ArtifactKind::Client);
        module
            .import(["apiConfig", "createAPIClient"], ArtifactKind::Runtime.module())
            .import_type(["AuthCallbacks"], ArtifactKind::Runtime.module())
            .import_type(type_imports(self.cx.signatures()), ArtifactKind::Types.module())
            .item(methods_type(self.cx))
            .item(CLIENT);
        module.into_string()
    }
}

/// Generates `server-client.ts`: a client without authentication,
/// for server-rendered code.
pub struct CodegenServerClient<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> CodegenServerClient<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }
}

impl Code for CodegenServerClient<'_> {
    fn path(&self) -> &str {
        ArtifactKind::ServerClient.file_name()
    }

    fn into_string(self) -> String {
        let mut module = TsModule::new(self.cx, ArtifactKind::ServerClient);
        module
            .import(["apiConfig", "createAPIClient"], ArtifactKind::Runtime.module())
            .import_type(type_imports(self.cx.signatures()), ArtifactKind::Types.module())
            .item(methods_type(self.cx))
            .item(SERVER_CLIENT);
        module.into_string()
    }
}

/// Emits `client.ts`, and `server-client.ts` for server-rendering
/// providers.
#[derive(Clone, Copy, Debug)]
pub struct ClientGenerator<'a> {
    cx: GeneratorContext<'a>,
}

impl<'a> ClientGenerator<'a> {
    pub fn new(cx: GeneratorContext<'a>) -> Self {
        Self { cx }
    }
}

impl Generator for ClientGenerator<'_> {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Client
    }

    fn artifacts(&self) -> Vec<Artifact> {
        let mut artifacts = vec![Artifact::from_code(
            ArtifactKind::Client,
            CodegenClient::new(self.cx),
        )];
        if self.cx.provider().is_server_rendering() {
            artifacts.push(Artifact::from_code(
                ArtifactKind::ServerClient,
                CodegenServerClient::new(self.cx),
            ));
        }
        artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::tests::{Fixture, LOGOUT, NEXTJS, USERS, VITE};

    #[test]
    fn test_methods_type() {
        let fixture = Fixture::new(
            VITE,
            indoc! {"
                baseUrl: https://api.example.com
                endpoints:
                  listUsers:
                    path: /users
                    method: GET
                    query: UserListQuerySchema
                    response: UserPageSchema
                    description: List all users
                  updateUser:
                    path: /users/{id}
                    method: PUT
                    params: UserIdParamsSchema
                    body: UpdateUserSchema
                    response: UserSchema
                  logout:
                    path: /auth/logout
                    method: POST
                    response: SuccessSchema
            "},
        );

        assert_eq!(
            methods_type(fixture.cx()),
            indoc! {"
                export type APIClientMethods = {
                  /**
                   * List all users
                   */
                  listUsers: (query?: ListUsersQuery) => Promise<ListUsersResponse>;
                  updateUser: (params: UpdateUserParams, body: UpdateUserBody) => Promise<UpdateUserResponse>;
                  logout: () => Promise<LogoutResponse>;
                };"
            }
        );
    }

    #[test]
    fn test_client_module() {
        let fixture = Fixture::new(VITE, LOGOUT);
        let text = CodegenClient::new(fixture.cx()).into_string();

        assert!(text.starts_with(indoc! {"
            'use client';

            import { apiConfig, createAPIClient } from './runtime';
            import type { AuthCallbacks } from './runtime';
            import type { LogoutResponse } from './types';

            export type APIClientMethods = {
              logout: () => Promise<LogoutResponse>;
            };

            export type APIClient = APIClientMethods & {
        "}));
        assert!(text.contains("export function initializeAPIClient"));
    }

    #[test]
    fn test_client_directive_can_be_disabled() {
        let config = format!("{VITE}\n[options]\nuse-client-directive = false\n");
        let fixture = Fixture::new(&config, LOGOUT);
        let text = CodegenClient::new(fixture.cx()).into_string();

        assert!(text.starts_with("import { apiConfig, createAPIClient } from './runtime';\n"));
    }

    #[test]
    fn test_server_client_module() {
        let fixture = Fixture::new(NEXTJS, USERS);
        let text = CodegenServerClient::new(fixture.cx()).into_string();

        assert!(!text.contains("'use client'"));
        assert!(!text.contains("AuthCallbacks"));
        assert!(text.ends_with(indoc! {"
            export const serverClient = createAPIClient(
              apiConfig,
            ) as unknown as APIClientMethods;
        "}));
    }

    #[test]
    fn test_server_client_only_for_nextjs() {
        let nextjs = Fixture::new(NEXTJS, USERS);
        let vite = Fixture::new(VITE, USERS);

        assert_eq!(
            ClientGenerator::new(nextjs.cx())
                .artifacts()
                .iter()
                .map(|artifact| artifact.kind())
                .collect_vec(),
            [ArtifactKind::Client, ArtifactKind::ServerClient]
        );
        assert_eq!(
            ClientGenerator::new(vite.cx())
                .artifacts()
                .iter()
                .map(|artifact| artifact.kind())
                .collect_vec(),
            [ArtifactKind::Client]
        );
    }
}
