use graphpath::query::{parse_step, Pipeline};
use graphpath::{
    EdgeId, Element, Environment, Error, Graph, GraphLoader, PathRegistry, PropertyValue,
    ScriptEvaluator, VertexId,
};

fn v(id: u64) -> Element {
    Element::Vertex(VertexId::new(id))
}

fn e(id: u64) -> Element {
    Element::Edge(EdgeId::new(id))
}

/// marko(1) -knows 0.4-> vadas(2), marko -knows 0.8-> josh(4), marko -created-> lop(3)
fn create_graph() -> Graph {
    let graph = Graph::new();
    let marko = graph.add_vertex_with_id(1, "person").unwrap();
    let vadas = graph.add_vertex_with_id(2, "person").unwrap();
    let lop = graph.add_vertex_with_id(3, "software").unwrap();
    let josh = graph.add_vertex_with_id(4, "person").unwrap();
    graph.set_vertex_property(marko, "name", "marko").unwrap();
    graph.set_vertex_property(vadas, "name", "vadas").unwrap();
    graph.set_vertex_property(josh, "name", "josh").unwrap();

    let e7 = graph.add_edge_with_id(7, "knows", marko, vadas).unwrap();
    let e8 = graph.add_edge_with_id(8, "knows", marko, josh).unwrap();
    let e9 = graph.add_edge_with_id(9, "created", marko, lop).unwrap();
    graph.set_edge_property(e7, "weight", 0.4).unwrap();
    graph.set_edge_property(e8, "weight", 0.8).unwrap();
    graph.set_edge_property(e9, "weight", 0.4).unwrap();
    graph
}

fn evaluate(graph: &Graph, script: &str, start: Vec<Element>) -> graphpath::Result<Vec<Element>> {
    ScriptEvaluator::new(graph).evaluate(script, Environment::new().with_context(start))
}

#[test]
fn test_knows_path() {
    let graph = create_graph();
    let script = "path knows\n./outE[@label='knows']\nend\n$_ := g:id('1')\n./knows";
    let result = ScriptEvaluator::new(&graph)
        .evaluate(script, Environment::new())
        .unwrap();
    assert_eq!(result, vec![e(7), e(8)]);
}

#[test]
fn test_knows_with_weight() {
    let graph = create_graph();
    let result = evaluate(&graph, "./outE[@label='knows' and @weight > 0.5]", vec![v(1)]).unwrap();
    assert_eq!(result, vec![e(8)]);
    let edge = graph.edge(EdgeId::new(8)).unwrap();
    assert_eq!(edge.property("weight"), Some(&PropertyValue::Float(0.8)));
}

#[test]
fn test_knows_path_with_weight_predicate() {
    let graph = create_graph();
    let script = "path knows\n./outE[@label='knows' and @weight > 0.5]\nend\n$_ := g:id('1')\n./knows";
    let result = ScriptEvaluator::new(&graph)
        .evaluate(script, Environment::new())
        .unwrap();
    assert_eq!(result, vec![e(8)]);
}

#[test]
fn test_variable_refinement() {
    let graph = create_graph();
    let top_level = "$x := ./outE[@label='knows']\n$x := $x[@weight > 0.5]\n$x";
    assert_eq!(evaluate(&graph, top_level, vec![v(1)]).unwrap(), vec![e(8)]);

    let in_path = "path heavyKnows\n\
                   $x := ./outE[@label='knows']\n\
                   $x := $x[@weight > 0.5]\n\
                   $x\n\
                   end\n\
                   ./heavyKnows";
    assert_eq!(evaluate(&graph, in_path, vec![v(1)]).unwrap(), vec![e(8)]);
}

#[test]
fn test_builtin_names_cannot_be_overridden() {
    let graph = create_graph();
    for name in ["outE", "inE", "bothV"] {
        let script = format!("path {}\n./outE\nend\n./{}", name, name);
        let err = evaluate(&graph, &script, vec![v(1)]).unwrap_err();
        assert!(matches!(err, Error::ReservedName(ref n) if n == name), "{}: {:?}", name, err);
    }

    // rejected before the body runs, even with an empty path body
    let err = ScriptEvaluator::new(&graph)
        .evaluate("$unbound\npath bothV\nend", Environment::new())
        .unwrap_err();
    assert!(matches!(err, Error::ReservedName(_)));

    let err = ScriptEvaluator::new(&graph)
        .evaluate("path outE\nend", Environment::new())
        .unwrap_err();
    assert!(matches!(err, Error::ReservedName(ref n) if n == "outE"));
}

#[test]
fn test_reserved_header_wins_over_body_errors() {
    let graph = create_graph();
    // a malformed line inside the reserved block is never reached
    let err = evaluate(&graph, "path outE\n./outE[@a >\nend", vec![v(1)]).unwrap_err();
    assert!(matches!(err, Error::ReservedName(ref n) if n == "outE"), "{:?}", err);

    // nor is a malformed statement after it
    let err = evaluate(&graph, "path inE\nend\n./outE[", vec![v(1)]).unwrap_err();
    assert!(matches!(err, Error::ReservedName(ref n) if n == "inE"), "{:?}", err);
}

#[test]
fn test_single_step_is_flat_map() {
    let graph = create_graph();
    let result = evaluate(&graph, "./inV", vec![e(9), e(7), e(9)]).unwrap();
    assert_eq!(result, vec![v(3), v(2), v(3)]);

    let result = evaluate(&graph, "./bothV", vec![e(8), e(7)]).unwrap();
    assert_eq!(result, vec![v(1), v(4), v(1), v(2)]);

    let result = evaluate(&graph, "./both", vec![v(4), v(1)]).unwrap();
    assert_eq!(result, vec![e(8), e(7), e(8), e(9)]);
}

#[test]
fn test_invocation_equals_inlining() {
    let graph = create_graph();
    let mut registry = PathRegistry::new();
    for definition in graphpath::query::parse_script("path knows\n./outE[@label='knows']\nend")
        .unwrap()
        .paths
    {
        registry.define(definition).unwrap();
    }
    let pipeline = Pipeline::new(&graph, &registry);
    let start = vec![v(1), v(2), v(4)];

    let invoked = pipeline
        .run(start.clone(), &[parse_step("./knows").unwrap()])
        .unwrap();
    let inlined = pipeline
        .run(start, &[parse_step("./outE[@label='knows']").unwrap()])
        .unwrap();
    assert_eq!(invoked, inlined);
}

#[test]
fn test_chained_navigation() {
    let graph = create_graph();
    let script = "path friends\n./outE[@label='knows']/inV\nend\n\
                  g:id(1)/friends[@name = 'josh' or @name = 'vadas']";
    let result = ScriptEvaluator::new(&graph)
        .evaluate(script, Environment::new())
        .unwrap();
    assert_eq!(result, vec![v(2), v(4)]);
}

#[test]
fn test_error_kinds() {
    let graph = create_graph();
    let evaluator = ScriptEvaluator::new(&graph);

    let err = evaluator.evaluate("./outE", Environment::new()).unwrap_err();
    assert!(matches!(err.root(), Error::UnboundVariable(name) if name == "_"));

    let err = evaluate(&graph, "g:id('42')", vec![]).unwrap_err();
    assert!(matches!(err.root(), Error::ElementNotFound(id) if id == "42"));

    let err = evaluate(&graph, "./likes", vec![v(1)]).unwrap_err();
    assert!(matches!(err.root(), Error::PathNotFound(name) if name == "likes"));

    let err = evaluate(&graph, "$_ := g:id('7')\n./outE", vec![]).unwrap_err();
    assert!(matches!(err.root(), Error::InvalidNavigation { .. }));
    assert!(matches!(err, Error::Statement { line: 2, .. }));

    let err = evaluate(&graph, "./outE[@weight > 'heavy']", vec![v(1)]).unwrap_err();
    assert!(matches!(err.root(), Error::PredicateType { .. }));

    let err = evaluate(&graph, "./outE[@weight >]", vec![v(1)]).unwrap_err();
    assert!(matches!(err.root(), Error::PredicateSyntax { .. }));

    let err = evaluate(&graph, "path a\n./b\nend\npath b\n./a\nend\n./a", vec![v(1)]).unwrap_err();
    assert!(matches!(err.root(), Error::RecursiveDefinition(chain) if chain == "a -> b -> a"));

    let err = evaluate(&graph, "path open\n./outE", vec![v(1)]).unwrap_err();
    assert!(matches!(err, Error::ScriptSyntax { line: 1, .. }));
}

#[test]
fn test_demo_script() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
    let graph = Graph::in_memory();
    let stats = GraphLoader::new(graph.clone())
        .load_file(dir.join("graph-example-1.json"))
        .unwrap();
    assert_eq!(stats.vertices_imported, 6);
    assert_eq!(stats.edges_imported, 6);

    let script = std::fs::read_to_string(dir.join("knows.path")).unwrap();
    let result = ScriptEvaluator::new(graph.as_ref())
        .evaluate(&script, Environment::new().with_context(vec![v(1)]))
        .unwrap();
    assert_eq!(result, vec![v(5), v(3)]);
}
