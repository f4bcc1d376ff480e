use modules_commonjs::{HoistPriority, ModuleTransformer, RunOptions, TransformCtx, TransformOptions};
use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::{GetSpan, SourceType};

fn run(input: &str) -> String {
    let out = ModuleTransformer::default()
        .transform(input, RunOptions { source_type: Some(SourceType::mjs()), ..RunOptions::default() })
        .unwrap();

    println!("==== INPUT ====\n{input}\n==== OUTPUT ====\n{}\n", out.code);
    out.code
}

fn run_jsx(options: TransformOptions, input: &str) -> String {
    let out = ModuleTransformer::new(options)
        .transform(input, RunOptions { source_type: Some(SourceType::mjs().with_jsx(true)), ..RunOptions::default() })
        .unwrap();

    println!("==== INPUT ====\n{input}\n==== OUTPUT ====\n{}\n", out.code);
    out.code
}

fn compact(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn reassignment_updates_every_export_alias() {
    let output = compact(&run("let a = 1;\nexport { a, a as b };\na = 2;\n"));
    assert!(output.contains("exports.b=exports.a=a=2;"));
}

#[test]
fn reassignment_inside_functions_is_mirrored() {
    let output = compact(&run("export let count = 0;\nexport function reset() { count = 0; }\n"));
    assert!(output.contains("letcount=exports.count=0;"));
    assert!(output.contains("functionreset(){exports.count=count=0;}"));
}

#[test]
fn compound_assignment_is_mirrored() {
    let output = compact(&run("export let total = 0;\nfunction add(n) { total += n; }\n"));
    assert!(output.contains("exports.total=total+=n;"));
}

#[test]
fn assignment_value_is_preserved() {
    let output = compact(&run("export let a;\nlog(a = 5);\n"));
    assert!(output.contains("log(exports.a=a=5);"));
}

#[test]
fn shadowed_export_is_not_mirrored() {
    let output = compact(&run("export let a = 1;\nfunction f() { let a; a = 2; }\n"));
    assert!(output.contains("leta;a=2;"));
    assert!(!output.contains("exports.a=a=2"));
}

#[test]
fn discarded_update_becomes_compound_assignment() {
    let output = compact(&run("export let n = 0;\nn++;\n--n;\nfinish();\n"));
    assert!(output.contains("exports.n=n+=1;exports.n=n-=1;finish();"));
}

#[test]
fn observed_postfix_update_keeps_previous_value() {
    let output = compact(&run("export let n = 0;\nlog(n++);\nlog(n--);\n"));
    assert!(output.contains("log((exports.n=n+=1,n-1));"));
    assert!(output.contains("log((exports.n=n-=1,n+1));"));
}

#[test]
fn observed_prefix_update_is_the_assignment() {
    let output = compact(&run("export let n = 0;\nlog(++n);\n"));
    assert!(output.contains("log(exports.n=n+=1);"));
}

#[test]
fn update_in_function_body_is_discarded() {
    let output = compact(&run("export let n = 0;\nexport function bump() { n++; }\n"));
    assert!(output.contains("functionbump(){exports.n=n+=1;}"));
}

#[test]
fn update_as_arrow_expression_body_returns_previous_value() {
    let output = compact(&run("export let n = 0;\nexport const next = () => n++;\nconst bump = () => { n++; };\n"));
    assert!(output.contains("()=>(exports.n=n+=1,n-1)"));
    assert!(output.contains("()=>{exports.n=n+=1;}"));
}

#[test]
fn update_in_do_while_before_other_statements_is_discarded() {
    let output = compact(&run("export let n = 0;\ndo { n++; } while (0);\nfoo();\n"));
    assert!(output.contains("do{exports.n=n+=1;}while(0);foo();"));
}

#[test]
fn jsx_tag_names_read_named_imports_live() {
    let output = compact(&run_jsx(
        TransformOptions::default(),
        "import { Button } from 'ui';\nconst x = <Button>go</Button>;\nfunction f(Button) { return <Button />; }\n",
    ));
    assert!(output.contains("constx=<_ui.Button>go</_ui.Button>;"));
    assert!(output.contains("functionf(Button){return<Button/>;}"));
}

#[test]
fn jsx_member_tags_read_strict_namespace_imports() {
    let output = compact(&run_jsx(
        TransformOptions { strict: true, ..TransformOptions::default() },
        "import * as ui from 'ui';\nconst y = <ui.Card />;\n",
    ));
    assert!(output.contains("consty=<_ui.Card/>;"));
}

#[test]
fn trailing_update_is_the_program_completion_value() {
    let output = compact(&run("export let n = 0;\nn++;\n"));
    assert!(output.contains("exports.n=n+=1,n-1"));
}

#[test]
fn export_list_of_an_import_reads_through_the_module() {
    let output = compact(&run("import { a } from './m';\nexport { a };\n"));
    assert!(output.contains("exports.a=_m.a;"));
}

#[test]
fn modules_without_module_syntax_are_unchanged() {
    let input = "var a = 1;\nfoo(a++);\nvar exports = {};\n";
    let out = ModuleTransformer::default()
        .transform(input, RunOptions { source_type: Some(SourceType::mjs()), ..RunOptions::default() })
        .unwrap();

    assert!(!out.modified);
    assert_eq!(compact(&out.code), compact(input));
}

#[test]
fn transforming_the_output_again_is_a_no_op() {
    let input = "import a, { b } from './m';\nimport * as ns from './n';\nexport let x = a;\nexport * from './o';\nx++;\nns.f(b);\n";
    let transformer = ModuleTransformer::default();
    let first = transformer
        .transform(input, RunOptions { source_type: Some(SourceType::mjs()), ..RunOptions::default() })
        .unwrap();
    assert!(first.modified);

    let second = transformer
        .transform(&first.code, RunOptions { source_type: Some(SourceType::cjs()), ..RunOptions::default() })
        .unwrap();
    assert!(!second.modified);
    assert_eq!(compact(&second.code), compact(&first.code));
}

#[test]
fn hoist_hints_move_statements_ahead() {
    let source_text = "setup();\nimport { a } from './m';\nuse(a);\n";
    let allocator = Allocator::default();
    let parse_ret = Parser::new(&allocator, source_text, SourceType::mjs()).parse();
    assert!(parse_ret.errors.is_empty());
    let mut program = parse_ret.program;
    let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();

    let mut ctx = TransformCtx::new(&allocator, scoping);
    ctx.hoist_hints.insert(program.body[0].span(), HoistPriority(4));

    let transformer = ModuleTransformer::new(TransformOptions::default());
    assert!(transformer.transform_program(&mut ctx, &mut program).unwrap());

    let output = compact(&Codegen::new().build(&program).code);
    assert!(output.starts_with("setup();var_m=require(\"./m\");"));
    assert!(output.contains("use(_m.a);"));
}
