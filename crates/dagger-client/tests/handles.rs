mod common;

use dagger_client::errors::{DaggerError, DaggerUnpackError};
use dagger_client::{
    CacheSharingMode, ContainerId, ContainerWithExecOptsBuilder, ContainerWithMountedCacheOptsBuilder,
    DirectoryId, FunctionWithArgOptsBuilder, GraphQLError, Json, ModuleId, NetworkProtocol,
    PortForward, QueryContainerOptsBuilder, TypeDefId, TypeDefKind,
};
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{client, domain_error};

#[tokio::test]
async fn test_loaded_handles_answer_id_from_cache() {
    let (client, recorder) = client();

    let container = client.load_container_from_id("container-1");

    assert_eq!(container.id().await.unwrap(), ContainerId::from("container-1"));
    assert_eq!(
        client.load_directory_from_id(DirectoryId::from("dir-1")).id().await.unwrap(),
        DirectoryId::from("dir-1")
    );
    assert!(recorder.queries().is_empty());
}

#[tokio::test]
async fn test_loaded_handles_query_through_load_field() {
    let (client, recorder) = client();
    recorder.respond(json!({"loadFileFromID": {"contents": "hello"}}));

    let contents = client.load_file_from_id("file-1").contents().await.unwrap();

    assert_eq!(contents, "hello");
    assert_eq!(
        recorder.queries(),
        vec![r#"query{loadFileFromID(id:"file-1"){contents}}"#.to_string()]
    );
}

#[tokio::test]
async fn test_chain_builds_nested_query() {
    let (client, recorder) = client();
    recorder.respond(json!({"container": {"from": {"withExec": {"stdout": "hi\n"}}}}));

    let out = client
        .container()
        .from("alpine")
        .with_exec(vec!["echo", "hi"])
        .stdout()
        .await
        .unwrap();

    assert_eq!(out, "hi\n");
    assert_eq!(
        recorder.queries(),
        vec![r#"query{container{from(address:"alpine"){withExec(args:["echo","hi"]){stdout}}}}"#
            .to_string()]
    );
}

#[tokio::test]
async fn test_zero_value_opts_are_not_sent() {
    let (client, recorder) = client();
    recorder.respond(json!({"container": {"withExec": {"stdout": ""}}}));

    let opts = ContainerWithExecOptsBuilder::default()
        .stdin("")
        .skip_entrypoint(false)
        .redirect_stdout("/tmp/out")
        .build()
        .unwrap();

    client
        .container_opts(QueryContainerOptsBuilder::default().platform("").build().unwrap())
        .with_exec_opts(vec!["true"], opts)
        .stdout()
        .await
        .unwrap();

    assert_eq!(
        recorder.queries(),
        vec![
            r#"query{container{withExec(args:["true"], redirectStdout:"/tmp/out"){stdout}}}"#
                .to_string()
        ]
    );
}

#[tokio::test]
async fn test_object_args_use_cached_ids() {
    let (client, recorder) = client();
    recorder.respond(json!({"container": {"withDirectory": {"id": "container-2"}}}));

    let id = client
        .container()
        .with_directory("/src", client.load_directory_from_id("dir-1"))
        .id()
        .await
        .unwrap();

    assert_eq!(id, ContainerId::from("container-2"));
    assert_eq!(
        recorder.queries(),
        vec![r#"query{container{withDirectory(path:"/src", directory:"dir-1"){id}}}"#.to_string()]
    );
}

#[tokio::test]
async fn test_object_args_resolve_ids_when_building() {
    let (client, recorder) = client();
    recorder.respond(json!({"host": {"directory": {"id": "dir-9"}}}));
    recorder.respond(json!({"container": {"withMountedDirectory": {"workdir": "/"}}}));

    let src = client.host().directory(".");
    let container = client.container().with_mounted_directory("/src", src);

    assert!(recorder.queries().is_empty());

    container.workdir().await.unwrap();

    assert_eq!(
        recorder.queries(),
        vec![
            r#"query{host{directory(path:"."){id}}}"#.to_string(),
            r#"query{container{withMountedDirectory(path:"/src", source:"dir-9"){workdir}}}"#
                .to_string(),
        ]
    );
}

#[tokio::test]
async fn test_enum_and_input_args() {
    let (client, recorder) = client();
    recorder.respond(json!({"container": {"withMountedCache": {"id": "c"}}}));
    recorder.respond(json!({"host": {"service": {"id": "s"}}}));

    let opts = ContainerWithMountedCacheOptsBuilder::default()
        .sharing(CacheSharingMode::Locked)
        .build()
        .unwrap();
    client
        .container()
        .with_mounted_cache_opts("/cache", client.load_cache_volume_from_id("cache-1"), opts)
        .id()
        .await
        .unwrap();

    client
        .host()
        .service(vec![PortForward {
            backend: 80,
            frontend: 8080,
            protocol: NetworkProtocol::Tcp,
        }])
        .id()
        .await
        .unwrap();

    assert_eq!(
        recorder.queries(),
        vec![
            r#"query{container{withMountedCache(path:"/cache", cache:"cache-1", sharing:LOCKED){id}}}"#
                .to_string(),
            r#"query{host{service(ports:[{backend:80,frontend:8080,protocol:TCP}]){id}}}"#
                .to_string(),
        ]
    );
}

#[tokio::test]
async fn test_list_accessors_return_loaded_handles() {
    let (client, recorder) = client();
    recorder.respond(json!({"container": {"envVariables": [{"id": "env-1"}, {"id": "env-2"}]}}));
    recorder.respond(json!({"loadEnvVariableFromID": {"name": "PATH"}}));

    let vars = client.container().env_variables().await.unwrap();

    assert_eq!(vars.len(), 2);
    assert_eq!(vars[1].id().await.unwrap().as_str(), "env-2");
    assert_eq!(vars[0].name().await.unwrap(), "PATH");
    assert_eq!(
        recorder.queries(),
        vec![
            r#"query{container{envVariables{id}}}"#.to_string(),
            r#"query{loadEnvVariableFromID(id:"env-1"){name}}"#.to_string(),
        ]
    );
}

#[tokio::test]
async fn test_sync_returns_the_same_handle() {
    let (client, recorder) = client();
    recorder.respond(json!({"container": {"from": {"sync": "container-1"}}}));
    recorder.respond(json!({"container": {"from": {"stdout": "ok"}}}));

    let synced = client.container().from("alpine").sync().await.unwrap();

    assert_eq!(synced.stdout().await.unwrap(), "ok");
    assert_eq!(
        recorder.queries()[1],
        r#"query{container{from(address:"alpine"){stdout}}}"#
    );
}

#[tokio::test]
async fn test_exec_errors_are_classified() {
    let (client, recorder) = client();
    recorder.fail(domain_error(
        "process \"false\" did not complete successfully: exit code: 1",
        json!({
            "_type": "EXEC_ERROR",
            "exitCode": 1,
            "cmd": ["false"],
            "stdout": "",
            "stderr": "failed",
        }),
    ));

    let err = client
        .container()
        .with_exec(vec!["false"])
        .sync()
        .await
        .unwrap_err();

    match err {
        DaggerError::Exec(exec) => {
            assert_eq!(exec.exit_code, 1);
            assert_eq!(exec.cmd, vec!["false".to_string()]);
            assert!(exec.to_string().ends_with("\nStderr:\nfailed"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_other_errors_pass_through() {
    let (client, recorder) = client();
    recorder.fail(GraphQLError::HttpError("connection refused".into()));
    recorder.fail(domain_error("unknown field", json!({"_type": "OTHER"})));

    let err = client.default_platform().await.unwrap_err();
    assert!(matches!(err, DaggerError::Query(GraphQLError::HttpError(_))));

    let err = client.default_platform().await.unwrap_err();
    assert!(matches!(
        err,
        DaggerError::Query(GraphQLError::DomainError { .. })
    ));
}

#[tokio::test]
async fn test_missing_data_is_an_unpack_error() {
    let (client, _recorder) = client();

    let err = client.check_version_compatibility("0.10.3").await.unwrap_err();

    assert!(matches!(
        err,
        DaggerError::Unpack(DaggerUnpackError::EmptyResponse)
    ));
}

#[tokio::test]
async fn test_with_applies_chain_fragments() {
    let (client, recorder) = client();
    recorder.respond(json!({"container": {"withEnvVariable": {"withWorkdir": {"id": "c"}}}}));

    let base = |c: dagger_client::Container| c.with_env_variable("CI", "true").with_workdir("/src");

    client.container().with(base).id().await.unwrap();

    assert_eq!(
        recorder.queries(),
        vec![
            r#"query{container{withEnvVariable(name:"CI", value:"true"){withWorkdir(path:"/src"){id}}}}"#
                .to_string()
        ]
    );
}

#[tokio::test]
async fn test_nullable_scalars_read_as_none() {
    let (client, recorder) = client();
    recorder.respond(json!({"container": {"envVariable": null}}));
    recorder.respond(json!({"loadPortFromID": {"description": null}}));
    recorder.respond(json!({"container": {"label": "v1"}}));

    let unset = client.container().env_variable("MISSING").await.unwrap();
    let description = client.load_port_from_id("port-1").description().await.unwrap();
    let label = client.container().label("version").await.unwrap();

    assert_eq!(unset, None);
    assert_eq!(description, None);
    assert_eq!(label, Some("v1".to_string()));
    assert_eq!(
        recorder.queries(),
        vec![
            r#"query{container{envVariable(name:"MISSING")}}"#.to_string(),
            r#"query{loadPortFromID(id:"port-1"){description}}"#.to_string(),
            r#"query{container{label(name:"version")}}"#.to_string(),
        ]
    );
}

#[tokio::test]
async fn test_failed_object_arg_lookup_aborts_the_query() {
    let (client, recorder) = client();
    recorder.fail(GraphQLError::HttpError("connection reset".into()));

    let src = client.host().directory(".");
    let err = client
        .container()
        .with_mounted_directory("/src", src)
        .workdir()
        .await
        .unwrap_err();

    assert!(matches!(err, DaggerError::Query(GraphQLError::HttpError(_))));
    assert_eq!(
        recorder.queries(),
        vec![r#"query{host{directory(path:"."){id}}}"#.to_string()]
    );
}

#[tokio::test]
async fn test_module_authoring_chain_resolves_nested_ids() {
    let (client, recorder) = client();
    recorder.respond(json!({"function": {"withArg": {"id": "fn-1"}}}));
    recorder.respond(json!({"typeDef": {"withObject": {"withFunction": {"id": "td-greeter"}}}}));
    recorder.respond(json!({"module": {"withObject": {"id": "mod-1"}}}));

    let string = client.load_type_def_from_id("td-string");
    let greet = client.function("greet", string.clone()).with_arg_opts(
        "name",
        string,
        FunctionWithArgOptsBuilder::default()
            .default_value(Json::from(r#""world""#))
            .build()
            .unwrap(),
    );
    let greeter = client.type_def().with_object("Greeter").with_function(greet);

    let id = client.module().with_object(greeter).id().await.unwrap();

    assert_eq!(id, ModuleId::from("mod-1"));
    assert_eq!(
        recorder.queries(),
        vec![
            r#"query{function(name:"greet", returnType:"td-string"){withArg(name:"name", typeDef:"td-string", defaultValue:"\"world\""){id}}}"#
                .to_string(),
            r#"query{typeDef{withObject(name:"Greeter"){withFunction(function:"fn-1"){id}}}}"#
                .to_string(),
            r#"query{module{withObject(object:"td-greeter"){id}}}"#.to_string(),
        ]
    );
}

#[tokio::test]
async fn test_type_def_kinds_and_source_views() {
    let (client, recorder) = client();
    recorder.respond(json!({"typeDef": {"withKind": {"kind": "STRING_KIND"}}}));
    recorder.respond(json!({"moduleSource": {"asGitSource": {"commit": "abc123"}}}));
    recorder.respond(json!({"loadModuleFromID": {"objects": [{"id": "td-1"}]}}));

    let kind = client
        .type_def()
        .with_kind(TypeDefKind::String)
        .kind()
        .await
        .unwrap();
    let commit = client
        .module_source("github.com/acme/mod")
        .as_git_source()
        .commit()
        .await
        .unwrap();
    let objects = client.load_module_from_id("mod-1").objects().await.unwrap();

    assert_eq!(kind, TypeDefKind::String);
    assert_eq!(commit, "abc123");
    assert_eq!(objects[0].id().await.unwrap(), TypeDefId::from("td-1"));
    assert_eq!(
        recorder.queries(),
        vec![
            r#"query{typeDef{withKind(kind:STRING_KIND){kind}}}"#.to_string(),
            r#"query{moduleSource(refString:"github.com/acme/mod"){asGitSource{commit}}}"#
                .to_string(),
            r#"query{loadModuleFromID(id:"mod-1"){objects{id}}}"#.to_string(),
        ]
    );
}
