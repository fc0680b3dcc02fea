use textgraph::{GraphRuntime, MemoryTextStore, NodeKind, SocketValue, StringMode};

fn main() {
    env_logger::init();

    let mut store = MemoryTextStore::new();
    store.insert("notes.txt", "hello world");

    let mut rt = GraphRuntime::new(Box::new(store));

    // Read notes.txt, slice out the first word, append a suffix, and write
    // the result to greeting.txt.
    let input = rt.add_node(NodeKind::TextFileInput);
    rt.bind_resource(input, Some("notes.txt".into())).unwrap();

    let sub = rt.add_node(NodeKind::String(StringMode::Substring));
    rt.connect(input, "Text", sub, "String").unwrap();
    rt.set_input_value(sub, "B:E:S", SocketValue::Int3([0, 5, 1]))
        .unwrap();

    let cat = rt.add_node(NodeKind::String(StringMode::Concatenate));
    rt.connect(sub, "String", cat, "String").unwrap();
    rt.set_input_value(cat, "String 2", SocketValue::from(", graph!"))
        .unwrap();

    let output = rt.add_node(NodeKind::TextFileOutput);
    rt.connect(cat, "String", output, "Text").unwrap();
    rt.bind_resource(output, Some("greeting.txt".into())).unwrap();

    println!("greeting.txt = {:?}", rt.store().read("greeting.txt"));

    // An external edit only reaches the graph once it is reported.
    rt.store_mut().write("notes.txt", "howdy partner");
    rt.notify_resource_changed("notes.txt");
    println!("greeting.txt = {:?}", rt.store().read("greeting.txt"));
}
