//! The semantic action catalogue for the baseline grammar (§6.2) and
//! the dispatch table that maps a [`Production`] to its handler.
//!
//! Instead of one virtual method per grammar rule, actions are plain
//! functions registered in a `Production -> fn` map (§9 "Stateful
//! action table"); the driver looks one up at each reduction and knows
//! nothing about grammar shape itself.

use super::tac::{self, TacEmitter};
use super::{check_var, size_of, Entry, SymbolTable, TableMap};
use crate::attribute::Attribute;
use crate::error::{EngineError, Result};
use crate::grammar::{GrammarSet, Production};
use crate::symbol::EPSILON;
use std::collections::HashMap;

/// Per-parse state threaded through every semantic action: the table
/// map, the stack of tables currently being populated, and the
/// temp/label counters.
#[derive(Debug)]
pub struct SemanticContext {
    pub tables: TableMap,
    pub stack: Vec<String>,
    pub tac: TacEmitter,
}

impl SemanticContext {
    pub fn new() -> Self {
        Self {
            tables: TableMap::new(),
            stack: vec!["system_table".to_string()],
            tac: TacEmitter::new(),
        }
    }

    pub fn current_table(&self) -> &str {
        self.stack.last().expect("table stack is never empty")
    }
}

impl Default for SemanticContext {
    fn default() -> Self {
        Self::new()
    }
}

pub type ActionFn = fn(&mut SemanticContext, &[Attribute]) -> Result<Attribute>;

/// Builds the `Production -> action` map for every production in
/// `grammar` that matches a known shape from the baseline grammar.
/// Productions from an arbitrary (non-baseline) grammar simply get no
/// entry; the driver treats that as "no semantic action registered"
/// and falls back to structural attribute passthrough.
pub fn build_action_table(grammar: &GrammarSet) -> HashMap<Production, ActionFn> {
    let mut table = HashMap::new();
    for production in grammar.all_productions() {
        if let Some(action) = classify(production) {
            table.insert(production.clone(), action);
        }
    }
    table
}

fn classify(p: &Production) -> Option<ActionFn> {
    let lhs = p.lhs.name();
    let r: Vec<&str> = p.rhs.iter().map(|s| s.name()).collect();

    match lhs {
        "P" if r == ["D'", "S'"] => Some(act_program),
        "D'" if r == [EPSILON] => Some(act_decls_empty),
        "D'" if r == ["D'", "D", ";"] => Some(act_decls_list),
        "D" if r == ["T", "d"] => Some(act_var_decl),
        "D" if r == ["T", "d", "[", "i", "]"] => Some(act_array_decl),
        "D" if r == ["T", "d", "(", "A'", ")", "{", "D'", "S'", "}"] => Some(act_func_decl),
        "T" if r.len() == 1 && matches!(r[0], "int" | "void" | "float") => Some(act_type),
        "A'" if r == [EPSILON] => Some(act_params_prologue),
        "A'" if r == ["A'", "A", ";"] => Some(act_params_list),
        "A" if r == ["T", "d"] => Some(act_param_var),
        "A" if r == ["T", "d", "[", "]"] => Some(act_param_array),
        "A" if r == ["T", "d", "(", ")"] => Some(act_param_func),
        "S'" if r == ["S"] => Some(act_sentences_single),
        "S'" if r == ["S'", ";", "S"] => Some(act_sentences_list),
        "S" if r == ["d", "=", "E"] => Some(act_assign_stmt),
        "S" if r == ["if", "(", "B", ")", "S"] => Some(act_if),
        "S" if r == ["if", "(", "B", ")", "S", "else", "S"] => Some(act_if_else),
        "S" if r == ["while", "(", "B", ")", "S"] => Some(act_while),
        "S" if r == ["return", "E"] => Some(act_return),
        "S" if r == ["{", "S'", "}"] => Some(act_block),
        "S" if r == ["d", "(", "R'", ")"] => Some(act_call_stmt),
        "S" if r == ["d", "[", "E", "]", "=", "E"] => Some(act_array_assign),
        "S" if r == ["for", "(", "S", ";", "B", ";", "S", ")", "S"] => Some(act_for),
        "S" if r == ["print", "E"] => Some(act_print),
        "S" if r == ["input", "d"] => Some(act_input),
        "B" if r.len() == 3 && r[1] == "\u{2227}" => Some(act_bool_and),
        "B" if r.len() == 3 && r[1] == "\u{2228}" => Some(act_bool_or),
        "B" if r == ["E", "r", "E"] => Some(act_bool_rel),
        "B" if r == ["E"] => Some(act_bool_from_expr),
        "E" if r == ["d", "=", "E"] => Some(act_expr_assign),
        "E" if r == ["i"] => Some(act_expr_num_int),
        "E" if r == ["f"] => Some(act_expr_num_float),
        "E" if r == ["d"] => Some(act_expr_var),
        "E" if r == ["d", "(", "R'", ")"] => Some(act_expr_call),
        "E" if r.len() == 3 && matches!(r[1], "+" | "-" | "*" | "/") && r[0] == "E" && r[2] == "E" => {
            Some(act_expr_operator)
        }
        "E" if r == ["(", "E", ")"] => Some(act_expr_bracket),
        "E" if r == ["d", "[", "E", "]"] => Some(act_expr_array),
        "R'" if r == [EPSILON] => Some(act_call_params_empty),
        "R'" if r == ["R'", "R", ","] => Some(act_call_params_list),
        "R" if r == ["E"] => Some(act_call_param_expr),
        "R" if r == ["d", "[", "]"] => Some(act_call_param_array),
        "R" if r == ["d", "(", ")"] => Some(act_call_param_func),
        _ => None,
    }
}

fn leaf(a: &Attribute) -> String {
    a.value().unwrap_or_default().to_string()
}

fn act_program(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    Ok(Attribute::P {
        code: vec![attrs.get(1).map(Attribute::code).unwrap_or_default()],
    })
}

fn act_decls_empty(_ctx: &mut SemanticContext, _attrs: &[Attribute]) -> Result<Attribute> {
    Ok(Attribute::D { place: vec![] })
}

fn act_decls_list(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let mut place = match &attrs[0] {
        Attribute::D { place } => place.clone(),
        _ => vec![],
    };
    if let Attribute::D { place: p } = &attrs[1] {
        place.extend(p.clone());
    }
    Ok(Attribute::D { place })
}

fn act_var_decl(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let ty = attrs[0].as_t().unwrap_or("int").to_string();
    let name = leaf(&attrs[1]);
    let table_name = ctx.current_table().to_string();
    let table = ctx.tables.get_mut(&table_name).expect("current table exists");
    table.width += size_of(&ty);
    let offset = table.width;
    table.add_entry(Entry::Var {
        name: name.clone(),
        r#type: ty,
        offset,
    })?;
    Ok(Attribute::D { place: vec![name] })
}

fn act_array_decl(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let ty = attrs[0].as_t().unwrap_or("int").to_string();
    let name = leaf(&attrs[1]);
    let len: i64 = leaf(&attrs[3]).parse().unwrap_or(0);
    let table_name = ctx.current_table().to_string();
    let table = ctx.tables.get_mut(&table_name).expect("current table exists");
    table.width += len * size_of(&ty);
    let base = table.width;
    table.add_entry(Entry::Array {
        name: name.clone(),
        etype: ty,
        base,
        dims: 1,
        dim: vec![len],
    })?;
    Ok(Attribute::D { place: vec![name] })
}

fn act_func_decl(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let ty = attrs[0].as_t().unwrap_or("void").to_string();
    let name = leaf(&attrs[1]);
    let body_code = attrs[7].code();

    let params_table_name = ctx
        .stack
        .pop()
        .ok_or_else(|| EngineError::Build("no function scope on the table stack".into()))?;
    let outer_table_name = ctx.current_table().to_string();

    let qualified = SymbolTable::qualified_name(&name, &outer_table_name);
    ctx.tables.rename(&params_table_name, qualified.clone())?;

    let outer_level = ctx
        .tables
        .get(&outer_table_name)
        .map(|t| t.level)
        .unwrap_or(0);
    {
        let table = ctx.tables.get_mut(&qualified).expect("just renamed");
        table.outer = Some(outer_table_name.clone());
        table.level = outer_level + 1;
        table.rtype = ty.clone();
        table.code = vec![body_code];
    }

    let offset = {
        let outer = ctx
            .tables
            .get_mut(&outer_table_name)
            .expect("outer table exists");
        outer.width += size_of("func");
        outer.width
    };
    ctx.tables
        .get_mut(&outer_table_name)
        .expect("outer table exists")
        .add_entry(Entry::Func {
            name: name.clone(),
            offset,
            mytab: qualified,
        })?;

    Ok(Attribute::D { place: vec![name] })
}

fn act_type(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    Ok(Attribute::T { r#type: leaf(&attrs[0]) })
}

fn act_params_prologue(ctx: &mut SemanticContext, _attrs: &[Attribute]) -> Result<Attribute> {
    let outer = ctx.current_table().to_string();
    let level = ctx.tables.get(&outer).map(|t| t.level + 1).unwrap_or(1);
    let name = format!("__scope{}", ctx.stack.len());
    ctx.tables.insert(SymbolTable::new(name.clone(), Some(outer), level));
    ctx.stack.push(name);
    Ok(Attribute::Ac { place: vec![] })
}

fn act_params_list(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let mut place = match &attrs[0] {
        Attribute::Ac { place } => place.clone(),
        _ => vec![],
    };
    if let Attribute::A { place: p } = &attrs[1] {
        place.extend(p.clone());
    }
    Ok(Attribute::Ac { place })
}

fn act_param_var(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let ty = attrs[0].as_t().unwrap_or("int").to_string();
    let name = leaf(&attrs[1]);
    let table_name = ctx.current_table().to_string();
    let table = ctx.tables.get_mut(&table_name).expect("current table exists");
    table.argc += 1;
    table.width += size_of(&ty);
    table.arglist.push(name.clone());
    let offset = table.width;
    table.add_entry(Entry::Var {
        name: name.clone(),
        r#type: ty,
        offset,
    })?;
    Ok(Attribute::A { place: vec![name] })
}

fn act_param_array(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let ty = attrs[0].as_t().unwrap_or("int").to_string();
    let name = leaf(&attrs[1]);
    let table_name = ctx.current_table().to_string();
    let table = ctx.tables.get_mut(&table_name).expect("current table exists");
    table.argc += 1;
    table.width += size_of("arrptt");
    table.arglist.push(name.clone());
    let base = table.width;
    table.add_entry(Entry::ArrayPtr {
        name: name.clone(),
        etype: ty,
        base,
    })?;
    Ok(Attribute::A { place: vec![name] })
}

fn act_param_func(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let ty = attrs[0].as_t().unwrap_or("void").to_string();
    let name = leaf(&attrs[1]);
    let table_name = ctx.current_table().to_string();
    let table = ctx.tables.get_mut(&table_name).expect("current table exists");
    table.argc += 1;
    table.width += size_of("funptt");
    table.arglist.push(name.clone());
    let offset = table.width;
    table.add_entry(Entry::FuncPtr {
        name: name.clone(),
        offset,
        rtype: ty,
    })?;
    Ok(Attribute::A { place: vec![name] })
}

fn act_sentences_single(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    Ok(Attribute::Sc {
        code: vec![attrs[0].code()],
    })
}

fn act_sentences_list(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let mut code = match &attrs[0] {
        Attribute::Sc { code } => code.clone(),
        _ => vec![],
    };
    code.push(attrs[2].code());
    Ok(Attribute::Sc { code })
}

fn act_assign_stmt(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let name = leaf(&attrs[0]);
    check_var(&ctx.tables, ctx.current_table(), &name)?;
    let (place, code, _ty, _num) = attrs[2].as_e().expect("E attribute");
    Ok(Attribute::S {
        code: format!("{code}{name} = {place};\n"),
    })
}

fn act_if(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let (tc, fc, bcode) = attrs[2].as_b().expect("B attribute");
    let mut out = bcode.to_string();
    out.push_str(&tac::gen_labels(tc));
    out.push_str(&attrs[4].code());
    out.push_str(&tac::gen_labels(fc));
    Ok(Attribute::S { code: out })
}

fn act_if_else(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let (tc, fc, bcode) = attrs[2].as_b().expect("B attribute");
    let label = ctx.tac.new_label();
    let mut out = bcode.to_string();
    out.push_str(&tac::gen_labels(tc));
    out.push_str(&attrs[4].code());
    out.push_str(&tac::gen_goto(&label));
    out.push_str(&tac::gen_labels(fc));
    out.push_str(&attrs[6].code());
    out.push_str(&tac::gen_label(&label));
    Ok(Attribute::S { code: out })
}

fn act_while(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let (tc, fc, bcode) = attrs[2].as_b().expect("B attribute");
    let label = ctx.tac.new_label();
    let mut out = tac::gen_label(&label);
    out.push_str(bcode);
    out.push_str(&tac::gen_labels(tc));
    out.push_str(&attrs[4].code());
    out.push_str(&tac::gen_goto(&label));
    out.push_str(&tac::gen_labels(fc));
    Ok(Attribute::S { code: out })
}

fn act_return(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let (place, code, _ty, _num) = attrs[1].as_e().expect("E attribute");
    Ok(Attribute::S {
        code: format!("{code}RETURN {place};\n"),
    })
}

fn act_block(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let blocks = match &attrs[1] {
        Attribute::Sc { code } => code.clone(),
        _ => vec![],
    };
    Ok(Attribute::S {
        code: tac::merge_code(&blocks),
    })
}

fn act_call_stmt(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let name = leaf(&attrs[0]);
    let entry = check_var(&ctx.tables, ctx.current_table(), &name)?.clone();
    if !entry.is_func() {
        return Err(EngineError::NotCallable(name));
    }
    let (places, codes) = match &attrs[2] {
        Attribute::Rc { place, code } => (place.clone(), code.clone()),
        _ => (vec![], vec![]),
    };
    let var = ctx.tac.new_temp();
    let mut out = tac::merge_code(&codes);
    out.push_str(&tac::new_params(&places));
    out.push_str(&format!("{var} = CALL {name}, {};\n", places.len()));
    Ok(Attribute::S { code: out })
}

fn act_array_assign(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let name = leaf(&attrs[0]);
    let entry = check_var(&ctx.tables, ctx.current_table(), &name)?.clone();
    if !entry.is_array() {
        return Err(EngineError::NotArray(name));
    }
    let (idx_place, idx_code, idx_ty, idx_num) = attrs[2].as_e().expect("E attribute");
    if idx_ty != "int" {
        return Err(EngineError::NonIntSubscript(name, idx_ty.to_string()));
    }
    check_constant_bounds(&entry, &name, idx_num)?;
    let (rhs_place, rhs_code, _ty, _num) = attrs[5].as_e().expect("E attribute");
    Ok(Attribute::S {
        code: format!("{idx_code}{rhs_code}{name}[{idx_place}] = {rhs_place};\n"),
    })
}

fn act_for(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let s1 = attrs[2].code();
    let (tc, fc, bcode) = attrs[4].as_b().expect("B attribute");
    let s2 = attrs[6].code();
    let s3 = attrs[8].code();
    let label = ctx.tac.new_label();
    let mut out = s1;
    out.push_str(&tac::gen_label(&label));
    out.push_str(bcode);
    out.push_str(&tac::gen_labels(tc));
    out.push_str(&s3);
    out.push_str(&s2);
    out.push_str(&tac::gen_goto(&label));
    out.push_str(&tac::gen_labels(fc));
    Ok(Attribute::S { code: out })
}

fn act_print(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let (place, code, _ty, _num) = attrs[1].as_e().expect("E attribute");
    Ok(Attribute::S {
        code: format!("{code}PRINT {place};\n"),
    })
}

fn act_input(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let name = leaf(&attrs[1]);
    check_var(&ctx.tables, ctx.current_table(), &name)?;
    Ok(Attribute::S {
        code: format!("INPUT {name};\n"),
    })
}

fn act_bool_and(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let (tc1, fc1, c1) = attrs[0].as_b().expect("B attribute");
    let (tc2, fc2, c2) = attrs[2].as_b().expect("B attribute");
    let fc = tac::merge_labels(fc1, fc2);
    let code = format!("{c1}{}{c2}", tac::gen_labels(tc1));
    Ok(Attribute::B {
        tc: tc2.to_vec(),
        fc,
        code,
    })
}

fn act_bool_or(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let (tc1, fc1, c1) = attrs[0].as_b().expect("B attribute");
    let (tc2, fc2, c2) = attrs[2].as_b().expect("B attribute");
    let tc = tac::merge_labels(tc1, tc2);
    let code = format!("{c1}{}{c2}", tac::gen_labels(fc1));
    Ok(Attribute::B {
        tc,
        fc: fc2.to_vec(),
        code,
    })
}

fn act_bool_rel(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let (p1, c1, _t1, _n1) = attrs[0].as_e().expect("E attribute");
    let op = leaf(&attrs[1]);
    let (p2, c2, _t2, _n2) = attrs[2].as_e().expect("E attribute");
    let l1 = ctx.tac.new_label();
    let l2 = ctx.tac.new_label();
    let code = format!("{c1}{c2}IF {p1} {op} {p2} THEN {l1} ELSE {l2};\n");
    Ok(Attribute::B {
        tc: vec![l1],
        fc: vec![l2],
        code,
    })
}

fn act_bool_from_expr(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let (p, c, _t, _n) = attrs[0].as_e().expect("E attribute");
    let l1 = ctx.tac.new_label();
    let l2 = ctx.tac.new_label();
    let code = format!("{c}IF {p} != 0 THEN {l1} ELSE {l2};\n");
    Ok(Attribute::B {
        tc: vec![l1],
        fc: vec![l2],
        code,
    })
}

fn act_expr_assign(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let name = leaf(&attrs[0]);
    let entry = check_var(&ctx.tables, ctx.current_table(), &name)?.clone();
    let (place, code, ty, num) = attrs[2].as_e().expect("E attribute");
    let r#type = if ty.is_empty() {
        entry.type_tag().to_string()
    } else {
        ty.to_string()
    };
    Ok(Attribute::E {
        place: name.clone(),
        code: format!("{code}{name} = {place};\n"),
        r#type,
        num: num.to_string(),
    })
}

fn act_expr_num_int(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let lexeme = leaf(&attrs[0]);
    let var = ctx.tac.new_temp();
    Ok(Attribute::E {
        place: var.clone(),
        code: format!("{var} = {lexeme};\n"),
        r#type: "int".into(),
        num: lexeme,
    })
}

fn act_expr_num_float(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let lexeme = leaf(&attrs[0]);
    let var = ctx.tac.new_temp();
    Ok(Attribute::E {
        place: var.clone(),
        code: format!("{var} = {lexeme};\n"),
        r#type: "float".into(),
        num: lexeme,
    })
}

fn act_expr_var(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let name = leaf(&attrs[0]);
    let r#type = check_var(&ctx.tables, ctx.current_table(), &name)?
        .type_tag()
        .to_string();
    let var = ctx.tac.new_temp();
    Ok(Attribute::E {
        place: var.clone(),
        code: format!("{var} = {name};\n"),
        r#type,
        num: String::new(),
    })
}

fn act_expr_call(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let name = leaf(&attrs[0]);
    let entry = check_var(&ctx.tables, ctx.current_table(), &name)?.clone();
    if !entry.is_func() {
        return Err(EngineError::NotCallable(name));
    }
    let rtype = match &entry {
        Entry::Func { mytab, .. } => ctx.tables.get(mytab).map(|t| t.rtype.clone()).unwrap_or_default(),
        Entry::FuncPtr { rtype, .. } => rtype.clone(),
        _ => unreachable!("is_func guards to Func/FuncPtr"),
    };
    if rtype == "void" {
        return Err(EngineError::VoidInExpression(name));
    }
    let (places, codes) = match &attrs[2] {
        Attribute::Rc { place, code } => (place.clone(), code.clone()),
        _ => (vec![], vec![]),
    };
    let var = ctx.tac.new_temp();
    let mut code = tac::merge_code(&codes);
    code.push_str(&tac::new_params(&places));
    code.push_str(&format!("{var} = CALL {name}, {};\n", places.len()));
    Ok(Attribute::E {
        place: var,
        code,
        r#type: rtype,
        num: String::new(),
    })
}

fn act_expr_operator(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let (p1, c1, t1, n1) = attrs[0].as_e().expect("E attribute");
    let op = leaf(&attrs[1]);
    let (p2, c2, t2, n2) = attrs[2].as_e().expect("E attribute");
    if t1 != t2 {
        return Err(EngineError::TypeMismatch {
            lhs: t1.to_string(),
            op: op.clone(),
            rhs: t2.to_string(),
        });
    }
    let var = ctx.tac.new_temp();
    let code = format!("{c1}{c2}{var} = {p1} {op} {p2};\n");
    let num = fold_constant(&op, n1, n2, t1 == "float")?;
    Ok(Attribute::E {
        place: var,
        code,
        r#type: t1.to_string(),
        num,
    })
}

fn act_expr_bracket(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    Ok(attrs[1].clone())
}

fn act_expr_array(ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let name = leaf(&attrs[0]);
    let entry = check_var(&ctx.tables, ctx.current_table(), &name)?.clone();
    if !entry.is_array() {
        return Err(EngineError::NotArray(name));
    }
    let (idx_place, idx_code, idx_ty, idx_num) = attrs[2].as_e().expect("E attribute");
    if idx_ty != "int" {
        return Err(EngineError::NonIntSubscript(name, idx_ty.to_string()));
    }
    check_constant_bounds(&entry, &name, idx_num)?;
    let etype = match &entry {
        Entry::Array { etype, .. } | Entry::ArrayPtr { etype, .. } => etype.clone(),
        _ => unreachable!("is_array guards to Array/ArrayPtr"),
    };
    let var = ctx.tac.new_temp();
    Ok(Attribute::E {
        place: var.clone(),
        code: format!("{idx_code}{var} = {name}[{idx_place}];\n"),
        r#type: etype,
        num: String::new(),
    })
}

fn act_call_params_empty(_ctx: &mut SemanticContext, _attrs: &[Attribute]) -> Result<Attribute> {
    Ok(Attribute::Rc {
        place: vec![],
        code: vec![],
    })
}

fn act_call_params_list(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let (mut place, mut code) = match &attrs[0] {
        Attribute::Rc { place, code } => (place.clone(), code.clone()),
        _ => (vec![], vec![]),
    };
    if let Attribute::R { place: p, code: c } = &attrs[1] {
        place.push(p.clone());
        code.push(c.clone());
    }
    Ok(Attribute::Rc { place, code })
}

fn act_call_param_expr(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    let (place, code, _ty, _num) = attrs[0].as_e().expect("E attribute");
    Ok(Attribute::R {
        place: place.to_string(),
        code: code.to_string(),
    })
}

fn act_call_param_array(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    Ok(Attribute::R {
        place: leaf(&attrs[0]),
        code: String::new(),
    })
}

fn act_call_param_func(_ctx: &mut SemanticContext, attrs: &[Attribute]) -> Result<Attribute> {
    Ok(Attribute::R {
        place: leaf(&attrs[0]),
        code: String::new(),
    })
}

fn check_constant_bounds(entry: &Entry, name: &str, idx_num: &str) -> Result<()> {
    if idx_num.is_empty() {
        return Ok(());
    }
    if let Some(dim) = entry.dim0() {
        let index: i64 = idx_num.parse().unwrap_or(0);
        if index < 0 || index >= dim {
            return Err(EngineError::SubscriptOutOfRange {
                name: name.to_string(),
                index,
                dim,
            });
        }
    }
    Ok(())
}

/// Constant folding for `E op E` when both operands carry a literal
/// `num`: int/int stays int, any float operand promotes both to
/// float. Division by a folded zero is a semantic error.
fn fold_constant(op: &str, num1: &str, num2: &str, promote_float: bool) -> Result<String> {
    if num1.is_empty() || num2.is_empty() {
        return Ok(String::new());
    }
    if promote_float {
        let a: f64 = num1.parse().unwrap_or(0.0);
        let b: f64 = num2.parse().unwrap_or(0.0);
        let result = match op {
            "+" => a + b,
            "-" => a - b,
            "*" => a * b,
            "/" => {
                if b == 0.0 {
                    return Err(EngineError::DivisionByZero);
                }
                a / b
            }
            _ => return Ok(String::new()),
        };
        Ok(result.to_string())
    } else {
        let a: i64 = num1.parse().unwrap_or(0);
        let b: i64 = num2.parse().unwrap_or(0);
        let result = match op {
            "+" => a + b,
            "-" => a - b,
            "*" => a * b,
            "/" => {
                if b == 0 {
                    return Err(EngineError::DivisionByZero);
                }
                a / b
            }
            _ => return Ok(String::new()),
        };
        Ok(result.to_string())
    }
}
