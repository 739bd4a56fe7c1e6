//! Snapshot tests for the text output formats

use soyparse::parse;
use soyparse::soy::formats::{serialize_program, to_treeviz_str};

const SHOP: &str = r#"{namespace shop}
/** Shows a cart. */
{template .cart}{@param items: list}{foreach $item in $items}{call .line}{param name: $item /}{param total: $item.price ?: 0 /}{/call}{/foreach}{/template}
{deltemplate shop.footer variant="'x'"}{let $year: 2024 /}Total: {$year}{let $sep: $year > 2000 ? ', ' : '' /}{/deltemplate}
"#;

#[test]
fn test_treeviz_snapshot() {
    let program = parse(SHOP).expect("shop parses");

    insta::assert_snapshot!(to_treeviz_str(&program).trim_end(), @r###"
    ├─ Template: shop.cart
    │ ├─ SoyDoc: Shows a cart.
    │ ├─ ParamDeclaration: items: list
    │ └─ OtherCmd: foreach
    │   └─ Call: shop.line
    │     ├─ Param: name
    │     │ └─ Reference: $item
    │     └─ Param: total
    │       └─ OtherExpression: $item.price ?: 0
    └─ DelTemplate: shop.footer ('x')
      ├─ Let: $year
      │ └─ NumberLiteral: 2024
      ├─ Text: "Total: "
      ├─ Interpolation: {$year}
      └─ Let: $sep
        └─ Ternary: $year > 2000 ? ', ' : ''
          ├─ OtherExpression: $year > 2000
          ├─ StringLiteral: ', '
          └─ StringLiteral: ''
    "###);
}

#[test]
fn test_tag_snapshot() {
    let program = parse("{namespace a}\n{template .t}{@param? x: int}{if $x}Hi {$x}{/if}{/template}")
        .expect("template parses");

    insta::assert_snapshot!(serialize_program(&program), @r###"
    <program namespace="a">
      <template name="a.t">
        <param name="x" required="false" type="int"/>
        <if>
          <text>Hi </text>
          <interpolation>$x</interpolation>
        </if>
      </template>
    </program>
    "###);
}
