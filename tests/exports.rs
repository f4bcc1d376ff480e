use modules_commonjs::{Error, ModuleTransformer, RunOptions, TransformOptions};

const MODULE_FLAG: &str = r#"Object.defineProperty(exports,"__esModule",{value:true});"#;

fn try_run_with(options: TransformOptions, input: &str) -> Result<String, Error> {
    let transformer = ModuleTransformer::new(options);
    let out = transformer
        .transform(input, RunOptions { source_type: Some(oxc_span::SourceType::mjs()), ..RunOptions::default() })?;

    println!("==== INPUT ====\n{input}\n==== OUTPUT ====\n{}\n", out.code);
    Ok(out.code)
}

fn run_with(options: TransformOptions, input: &str) -> String {
    try_run_with(options, input).unwrap()
}

fn run(input: &str) -> String {
    run_with(TransformOptions::default(), input)
}

fn compact(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn default_expression_export_follows_module_flag() {
    let output = compact(&run("export default foo;\n"));
    assert!(output.starts_with(&format!("{MODULE_FLAG}exports.default=foo;")));
}

#[test]
fn export_list_assigns_each_local() {
    let output = compact(&run("var foo = 1, bar = 2;\nexport { foo, bar };\n"));
    assert!(output.starts_with(MODULE_FLAG));
    assert!(output.contains("varfoo=1,bar=2;exports.foo=foo;exports.bar=bar;"));
}

#[test]
fn export_list_supports_aliases_and_fan_out() {
    let output = compact(&run("let a = 1;\nexport { a, a as b, a as 'c-d' };\n"));
    assert!(output.contains("exports.a=a;exports.b=a;exports[\"c-d\"]=a;"));
}

#[test]
fn empty_export_list_still_flags_the_module() {
    let output = compact(&run("foo();\nexport {};\n"));
    assert_eq!(output, format!("{MODULE_FLAG}foo();"));
}

#[test]
fn named_default_function_is_kept_and_exported_first() {
    let output = compact(&run("foo();\nexport default function f() { return 1; }\n"));
    assert!(output.contains(&format!("{MODULE_FLAG}exports.default=f;foo();functionf(){{return1;}}")));
}

#[test]
fn anonymous_default_function_becomes_an_expression() {
    let output = compact(&run("export default function () { return 1; }\n"));
    assert!(output.contains("exports.default=function(){return1;};"));
}

#[test]
fn named_default_class_is_assigned_after_declaration() {
    let output = compact(&run("export default class A {}\nnew A();\n"));
    assert!(output.contains("classA{}exports.default=A;newA();"));
}

#[test]
fn anonymous_default_class_is_replaced_in_place() {
    let output = compact(&run("foo();\nexport default class {}\n"));
    assert!(output.contains("foo();exports.default=class{};"));
}

#[test]
fn exported_function_assignment_is_hoisted() {
    let output = compact(&run("foo();\nexport function f() {}\n"));
    assert!(output.contains(&format!("{MODULE_FLAG}exports.f=f;foo();functionf(){{}}")));
}

#[test]
fn exported_class_is_assigned_after_declaration() {
    let output = compact(&run("export class B {}\n"));
    assert!(output.contains("classB{}exports.B=B;"));
}

#[test]
fn exported_variables_assign_through_initializer() {
    let output = compact(&run("export var a = 1, b;\nexport const c = f();\n"));
    assert!(output.contains("vara=exports.a=1,b=exports.b=undefined;"));
    assert!(output.contains("constc=exports.c=f();"));
}

#[test]
fn destructured_exports_are_assigned_after_the_pattern() {
    let output = compact(&run("export const { a, b: c } = obj;\n"));
    assert!(output.contains("const{a,b:c}=obj;exports.a=a;exports.c=c;"));
}

#[test]
fn reexports_use_getters_on_the_required_module() {
    let output = compact(&run("export { a, b as c, default as d } from './m';\n"));

    assert!(output.contains("var_m=require(\"./m\");"));
    assert!(output.contains(
        "Object.defineProperty(exports,\"a\",{enumerable:true,get:function(){return_m.a;}});"
    ));
    assert!(output.contains(
        "Object.defineProperty(exports,\"c\",{enumerable:true,get:function(){return_m.b;}});"
    ));
    assert!(output.contains(
        "Object.defineProperty(exports,\"d\",{enumerable:true,get:function(){return_interopRequireDefault(_m).default;}});"
    ));
}

#[test]
fn reexport_and_import_of_one_path_share_a_require() {
    let output = compact(&run("import x from './m';\nexport { y } from './m';\nuse(x);\n"));
    assert_eq!(output.matches("require(\"./m\")").count(), 1);
}

#[test]
fn export_all_copies_every_key_but_default() {
    let output = compact(&run("export * from './m';\n"));

    assert!(output.starts_with(MODULE_FLAG));
    assert!(output.contains("var_m=require(\"./m\");"));
    assert!(output.contains(
        "Object.keys(_m).forEach(function(key){if(key===\"default\")return;Object.defineProperty(exports,key,{enumerable:true,get:function(){return_m[key];}});});"
    ));
}

#[test]
fn export_namespace_is_a_getter_for_the_wrapped_module() {
    let output = compact(&run("export * as ns from './m';\n"));
    assert!(output.contains(
        "Object.defineProperty(exports,\"ns\",{enumerable:true,get:function(){return_interopRequireWildcard(_m);}});"
    ));

    let strict = compact(&run_with(
        TransformOptions { strict: true, ..TransformOptions::default() },
        "export * as ns from './m';\n",
    ));
    assert!(strict.contains("get:function(){return_m;}"));
}

#[test]
fn loose_and_strict_flags_are_plain_assignments() {
    for options in [
        TransformOptions { loose: true, ..TransformOptions::default() },
        TransformOptions { strict: true, ..TransformOptions::default() },
    ] {
        let output = compact(&run_with(options, "export default 1;\n"));
        assert!(output.starts_with("exports.__esModule=true;exports.default=1;"));
        assert!(!output.contains("Object.defineProperty(exports,\"__esModule\""));
    }
}

#[test]
fn non_hoisted_exports_are_predeclared_when_importing() {
    let output = compact(&run("import x from 'x';\nexport const a = x;\nexport class B {}\nexport function f() {}\n"));
    assert!(output.starts_with(&format!("{MODULE_FLAG}exports.B=exports.a=undefined;exports.f=f;var_x=require(\"x\");")));
}

#[test]
fn no_predeclaration_without_imports() {
    let output = compact(&run("export const a = 1;\n"));
    assert!(!output.contains("undefined"));
}

#[test]
fn add_exports_aliases_a_default_only_module() {
    let options = TransformOptions { add_exports: true, ..TransformOptions::default() };

    let output = compact(&run_with(options, "export default 42;\n"));
    assert!(output.ends_with("exports.default=42;module.exports=exports[\"default\"];"));

    let output = compact(&run_with(options, "export default 42;\nexport const a = 1;\n"));
    assert!(!output.contains("module.exports"));

    let output = compact(&run("export default 42;\n"));
    assert!(!output.contains("module.exports"));
}

#[test]
fn exporting_the_module_flag_name_fails() {
    let inputs = [
        "export const __esModule = true;\n",
        "var x;\nexport { x as __esModule };\n",
        "export function __esModule() {}\n",
        "export class __esModule {}\n",
        "export default function __esModule() {}\n",
        "export default class __esModule {}\n",
        "export { __esModule } from './m';\n",
        "export * as __esModule from './m';\n",
    ];
    for input in inputs {
        let err = try_run_with(TransformOptions::default(), input).unwrap_err();
        assert!(matches!(err, Error::IllegalExportName { ref name, .. } if name == "__esModule"), "{input}");
        assert!(err.to_string().starts_with("Illegal export \"__esModule\""));
    }
}

#[test]
fn module_level_commonjs_names_are_renamed() {
    let output = compact(&run("var exports = {};\nfunction require() {}\nexport default exports;\nrequire();\n"));

    assert!(output.contains("var_exports={};"));
    assert!(output.contains("function_require(){}"));
    assert!(output.contains("exports.default=_exports;"));
    assert!(output.contains("_require();"));
}

#[test]
fn typescript_only_exports_produce_no_code() {
    let transformer = ModuleTransformer::default();
    let out = transformer
        .transform(
            "export type A = string;\nexport interface I {}\nexport declare const d: number;\nexport const x: A = 'x';\n",
            RunOptions { source_type: Some(oxc_span::SourceType::ts()), ..RunOptions::default() },
        )
        .unwrap();
    let output = compact(&out.code);

    assert!(output.contains("exports.x=\"x\""));
    assert!(!output.contains("exports.A"));
    assert!(!output.contains("exports.I"));
    assert!(!output.contains("exports.d"));
}

#[test]
fn typescript_export_assignment_replaces_module_exports() {
    let transformer = ModuleTransformer::default();
    let out = transformer
        .transform(
            "import a from './a';\nexport = a;\n",
            RunOptions { source_type: Some(oxc_span::SourceType::ts()), ..RunOptions::default() },
        )
        .unwrap();
    let output = compact(&out.code);

    assert!(output.contains("module.exports=a;"));
    assert!(!output.contains("__esModule\",{value:true}"));
}
