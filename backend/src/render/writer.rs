//! PPTX archive assembly.
//!
//! Builds the full Office Open XML part set for a deck: package plumbing,
//! one minimal theme and blank layout, and exactly one slide per document
//! slide with layout-specific shapes.

use std::collections::HashMap;
use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::domain::ports::FetchedImage;
use crate::domain::{
    BulletStyle, LayoutKind, Palette, PresentationDocument, Slide, SlideContent, ThemeKind,
    GRID_ITEM_LIMIT,
};

use super::geometry::{self, Rect};
use super::{
    NS_DRAWING, NS_PRESENTATION, NS_RELATIONSHIPS, REL_TYPE_IMAGE, REL_TYPE_SLIDE,
    REL_TYPE_SLIDE_LAYOUT, REL_TYPE_SLIDE_MASTER, REL_TYPE_THEME,
};

/// Archive assembly failure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
}

/// One embedded picture: archive name plus source bytes.
struct MediaPart<'a> {
    name: String,
    data: &'a [u8],
}

/// Deterministic PPTX renderer.
#[derive(Debug, Default)]
pub struct PptxRenderer;

impl PptxRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render `document` to PPTX bytes.
    ///
    /// `images` maps slide ids to downloaded picture bytes; slides without
    /// an entry render text-only. `exported_at` stamps the core properties,
    /// keeping the output reproducible for a fixed timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the archive cannot be written.
    pub fn render(
        &self,
        document: &PresentationDocument,
        images: &HashMap<Uuid, FetchedImage>,
        exported_at: DateTime<Utc>,
    ) -> Result<Vec<u8>, RenderError> {
        let palette = document.theme.palette();
        let font = document.theme.font();

        // Media names are assigned in slide order.
        let mut media: Vec<MediaPart<'_>> = Vec::new();
        let mut media_for_slide: HashMap<Uuid, String> = HashMap::new();
        for slide in &document.slides {
            if let Some(image) = images.get(&slide.id) {
                let name = format!("image{}.{}", media.len() + 1, image.extension());
                media_for_slide.insert(slide.id, name.clone());
                media.push(MediaPart {
                    name,
                    data: &image.bytes,
                });
            }
        }

        // The embedded slide count must equal the stored slide count.
        let slide_total = document.slides.len();
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        write_content_types(&mut zip, options, slide_total)?;
        write_root_rels(&mut zip, options)?;
        write_app_xml(&mut zip, options, slide_total)?;
        write_core_xml(&mut zip, options, &document.title, exported_at)?;
        write_presentation_xml(&mut zip, options, slide_total)?;
        write_presentation_rels(&mut zip, options, slide_total)?;
        write_pres_props(&mut zip, options)?;
        write_table_styles(&mut zip, options)?;
        write_view_props(&mut zip, options)?;
        write_theme(&mut zip, options, document.theme)?;
        write_slide_master(&mut zip, options)?;
        write_slide_layout(&mut zip, options)?;

        for (index, slide) in document.slides.iter().enumerate() {
            let media_name = media_for_slide.get(&slide.id).map(String::as_str);
            let xml = content_slide_xml(slide, &palette, font, media_name.is_some());
            write_slide(&mut zip, options, index + 1, &xml, media_name)?;
        }

        for part in &media {
            zip.start_file(format!("ppt/media/{}", part.name), options)?;
            zip.write_all(part.data)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

type Zip = ZipWriter<Cursor<Vec<u8>>>;

fn write_content_types(
    zip: &mut Zip,
    options: SimpleFileOptions,
    slide_total: usize,
) -> Result<(), RenderError> {
    zip.start_file("[Content_Types].xml", options)?;

    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="png" ContentType="image/png"/>
  <Default Extension="jpeg" ContentType="image/jpeg"/>
  <Default Extension="jpg" ContentType="image/jpeg"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
  <Override PartName="/ppt/presProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"/>
  <Override PartName="/ppt/tableStyles.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml"/>
  <Override PartName="/ppt/viewProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml"/>
  <Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
  <Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
  <Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
  <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
"#,
    );
    for i in 1..=slide_total {
        content.push_str(&format!(
            "  <Override PartName=\"/ppt/slides/slide{i}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>\n",
        ));
    }
    content.push_str("</Types>");

    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn write_root_rels(zip: &mut Zip, options: SimpleFileOptions) -> Result<(), RenderError> {
    zip.start_file("_rels/.rels", options)?;
    let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn write_app_xml(
    zip: &mut Zip,
    options: SimpleFileOptions,
    slide_total: usize,
) -> Result<(), RenderError> {
    zip.start_file("docProps/app.xml", options)?;
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <TotalTime>0</TotalTime>
  <Words>0</Words>
  <Application>Presentation Generator</Application>
  <PresentationFormat>On-screen Show (16:9)</PresentationFormat>
  <Paragraphs>0</Paragraphs>
  <Slides>{slide_total}</Slides>
  <Notes>0</Notes>
  <HiddenSlides>0</HiddenSlides>
  <MMClips>0</MMClips>
  <ScaleCrop>false</ScaleCrop>
  <LinksUpToDate>false</LinksUpToDate>
  <SharedDoc>false</SharedDoc>
  <HyperlinksChanged>false</HyperlinksChanged>
  <AppVersion>1.0</AppVersion>
</Properties>"#,
    );
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn write_core_xml(
    zip: &mut Zip,
    options: SimpleFileOptions,
    title: &str,
    exported_at: DateTime<Utc>,
) -> Result<(), RenderError> {
    zip.start_file("docProps/core.xml", options)?;
    let stamp = exported_at.format("%Y-%m-%dT%H:%M:%SZ");
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>{title}</dc:title>
  <dc:creator>Presentation Generator</dc:creator>
  <cp:lastModifiedBy>Presentation Generator</cp:lastModifiedBy>
  <dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>
  <dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>
</cp:coreProperties>"#,
        title = escape_xml(title),
    );
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn write_presentation_xml(
    zip: &mut Zip,
    options: SimpleFileOptions,
    slide_total: usize,
) -> Result<(), RenderError> {
    zip.start_file("ppt/presentation.xml", options)?;

    let mut slide_refs = String::new();
    for i in 1..=slide_total {
        // rId1=slideMaster, rId2=presProps, rId3=theme, rId4 onwards=slides.
        slide_refs.push_str(&format!(
            "    <p:sldId id=\"{}\" r:id=\"rId{}\"/>\n",
            255 + i,
            i + 3
        ));
    }

    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}" saveSubsetFonts="1">
  <p:sldMasterIdLst>
    <p:sldMasterId id="2147483648" r:id="rId1"/>
  </p:sldMasterIdLst>
  <p:sldIdLst>
{slide_refs}  </p:sldIdLst>
  <p:sldSz cx="{width}" cy="{height}"/>
  <p:notesSz cx="{height}" cy="{width}"/>
</p:presentation>"#,
        width = geometry::SLIDE_WIDTH_EMU,
        height = geometry::SLIDE_HEIGHT_EMU,
    );
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn write_presentation_rels(
    zip: &mut Zip,
    options: SimpleFileOptions,
    slide_total: usize,
) -> Result<(), RenderError> {
    zip.start_file("ppt/_rels/presentation.xml.rels", options)?;

    let mut rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{REL_TYPE_SLIDE_MASTER}" Target="slideMasters/slideMaster1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps" Target="presProps.xml"/>
  <Relationship Id="rId3" Type="{REL_TYPE_THEME}" Target="theme/theme1.xml"/>
"#,
    );
    for i in 1..=slide_total {
        rels.push_str(&format!(
            "  <Relationship Id=\"rId{}\" Type=\"{REL_TYPE_SLIDE}\" Target=\"slides/slide{i}.xml\"/>\n",
            i + 3,
        ));
    }
    rels.push_str("</Relationships>");

    zip.write_all(rels.as_bytes())?;
    Ok(())
}

fn write_pres_props(zip: &mut Zip, options: SimpleFileOptions) -> Result<(), RenderError> {
    zip.start_file("ppt/presProps.xml", options)?;
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentationPr xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}">
  <p:extLst/>
</p:presentationPr>"#,
    );
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn write_table_styles(zip: &mut Zip, options: SimpleFileOptions) -> Result<(), RenderError> {
    zip.start_file("ppt/tableStyles.xml", options)?;
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:tblStyleLst xmlns:a="{NS_DRAWING}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#,
    );
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn write_view_props(zip: &mut Zip, options: SimpleFileOptions) -> Result<(), RenderError> {
    zip.start_file("ppt/viewProps.xml", options)?;
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:viewPr xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}">
  <p:normalViewPr>
    <p:restoredLeft sz="15620"/>
    <p:restoredTop sz="94660"/>
  </p:normalViewPr>
  <p:slideViewPr>
    <p:cSldViewPr>
      <p:cViewPr>
        <p:scale>
          <a:sx n="100" d="100"/>
          <a:sy n="100" d="100"/>
        </p:scale>
        <p:origin x="0" y="0"/>
      </p:cViewPr>
    </p:cSldViewPr>
  </p:slideViewPr>
</p:viewPr>"#,
    );
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn write_theme(
    zip: &mut Zip,
    options: SimpleFileOptions,
    theme: ThemeKind,
) -> Result<(), RenderError> {
    zip.start_file("ppt/theme/theme1.xml", options)?;
    let palette = theme.palette();
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="{NS_DRAWING}" name="{name}">
  <a:themeElements>
    <a:clrScheme name="{name}">
      <a:dk1><a:srgbClr val="{text}"/></a:dk1>
      <a:lt1><a:srgbClr val="{background}"/></a:lt1>
      <a:dk2><a:srgbClr val="44546A"/></a:dk2>
      <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
      <a:accent1><a:srgbClr val="{accent}"/></a:accent1>
      <a:accent2><a:srgbClr val="{accent_alt}"/></a:accent2>
      <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
      <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
      <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
      <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
      <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="{name}">
      <a:majorFont>
        <a:latin typeface="{font}"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
      </a:majorFont>
      <a:minorFont>
        <a:latin typeface="{font}"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
      </a:minorFont>
    </a:fontScheme>
    <a:fmtScheme name="Office">
      <a:fillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:fillStyleLst>
      <a:lnStyleLst>
        <a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
      </a:lnStyleLst>
      <a:effectStyleLst>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
      </a:effectStyleLst>
      <a:bgFillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:bgFillStyleLst>
    </a:fmtScheme>
  </a:themeElements>
</a:theme>"#,
        name = theme.as_str(),
        text = palette.text.to_hex(),
        background = palette.background.to_hex(),
        accent = palette.accent.to_hex(),
        accent_alt = palette.accent_alt.to_hex(),
        font = theme.font(),
    );
    zip.write_all(content.as_bytes())?;
    Ok(())
}

fn write_slide_master(zip: &mut Zip, options: SimpleFileOptions) -> Result<(), RenderError> {
    zip.start_file("ppt/slideMasters/slideMaster1.xml", options)?;
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}">
  <p:cSld>
    <p:bg>
      <p:bgRef idx="1001">
        <a:schemeClr val="bg1"/>
      </p:bgRef>
    </p:bg>
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
    </p:spTree>
  </p:cSld>
  <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
  <p:sldLayoutIdLst>
    <p:sldLayoutId id="2147483649" r:id="rId1"/>
  </p:sldLayoutIdLst>
</p:sldMaster>"#,
    );
    zip.write_all(content.as_bytes())?;

    zip.start_file("ppt/slideMasters/_rels/slideMaster1.xml.rels", options)?;
    let rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{REL_TYPE_SLIDE_LAYOUT}" Target="../slideLayouts/slideLayout1.xml"/>
  <Relationship Id="rId2" Type="{REL_TYPE_THEME}" Target="../theme/theme1.xml"/>
</Relationships>"#,
    );
    zip.write_all(rels.as_bytes())?;
    Ok(())
}

fn write_slide_layout(zip: &mut Zip, options: SimpleFileOptions) -> Result<(), RenderError> {
    zip.start_file("ppt/slideLayouts/slideLayout1.xml", options)?;
    let content = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}" type="blank" preserve="1">
  <p:cSld name="Blank">
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
    </p:spTree>
  </p:cSld>
  <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#,
    );
    zip.write_all(content.as_bytes())?;

    zip.start_file("ppt/slideLayouts/_rels/slideLayout1.xml.rels", options)?;
    let rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{REL_TYPE_SLIDE_MASTER}" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#,
    );
    zip.write_all(rels.as_bytes())?;
    Ok(())
}

fn write_slide(
    zip: &mut Zip,
    options: SimpleFileOptions,
    slide_num: usize,
    xml: &str,
    media_name: Option<&str>,
) -> Result<(), RenderError> {
    zip.start_file(format!("ppt/slides/slide{slide_num}.xml"), options)?;
    zip.write_all(xml.as_bytes())?;

    zip.start_file(format!("ppt/slides/_rels/slide{slide_num}.xml.rels"), options)?;
    let mut rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="{REL_TYPE_SLIDE_LAYOUT}" Target="../slideLayouts/slideLayout1.xml"/>
"#,
    );
    if let Some(name) = media_name {
        rels.push_str(&format!(
            "  <Relationship Id=\"rId2\" Type=\"{REL_TYPE_IMAGE}\" Target=\"../media/{name}\"/>\n",
        ));
    }
    rels.push_str("</Relationships>");
    zip.write_all(rels.as_bytes())?;
    Ok(())
}

/// Run style for a text paragraph.
struct ParaStyle<'a> {
    size: u32,
    color: &'a str,
    bold: bool,
    centred: bool,
    font: &'a str,
}

fn paragraph(text: &str, style: &ParaStyle<'_>) -> String {
    let algn = if style.centred { " algn=\"ctr\"" } else { "" };
    let bold = if style.bold { " b=\"1\"" } else { "" };
    format!(
        r#"          <a:p>
            <a:pPr{algn}><a:buNone/></a:pPr>
            <a:r>
              <a:rPr lang="en-US" sz="{size}"{bold}>
                <a:solidFill><a:srgbClr val="{color}"/></a:solidFill>
                <a:latin typeface="{font}"/>
              </a:rPr>
              <a:t>{text}</a:t>
            </a:r>
          </a:p>
"#,
        size = style.size,
        color = style.color,
        font = style.font,
        text = escape_xml(text),
    )
}

fn shape_xfrm(rect: Rect) -> String {
    format!(
        r#"          <a:xfrm>
            <a:off x="{x}" y="{y}"/>
            <a:ext cx="{cx}" cy="{cy}"/>
          </a:xfrm>
"#,
        x = rect.x,
        y = rect.y,
        cx = rect.cx,
        cy = rect.cy,
    )
}

/// A borderless text box.
fn text_shape(id: u32, name: &str, rect: Rect, paragraphs: &str) -> String {
    format!(
        r#"      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="{id}" name="{name}"/>
          <p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>
          <p:nvPr/>
        </p:nvSpPr>
        <p:spPr>
{xfrm}          <a:prstGeom prst="rect"><a:avLst/></a:prstGeom>
          <a:noFill/>
        </p:spPr>
        <p:txBody>
          <a:bodyPr wrap="square"><a:normAutofit/></a:bodyPr>
          <a:lstStyle/>
{paragraphs}        </p:txBody>
      </p:sp>
"#,
        xfrm = shape_xfrm(rect),
    )
}

/// A solid-filled shape, optionally carrying text.
fn filled_shape(id: u32, name: &str, prst: &str, rect: Rect, color: &str, paragraphs: &str) -> String {
    let body = if paragraphs.is_empty() {
        String::from(
            "        <p:txBody>\n          <a:bodyPr/>\n          <a:lstStyle/>\n          <a:p><a:endParaRPr lang=\"en-US\"/></a:p>\n        </p:txBody>\n",
        )
    } else {
        format!(
            "        <p:txBody>\n          <a:bodyPr wrap=\"square\" anchor=\"ctr\"><a:normAutofit/></a:bodyPr>\n          <a:lstStyle/>\n{paragraphs}        </p:txBody>\n",
        )
    };
    format!(
        r#"      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="{id}" name="{name}"/>
          <p:cNvSpPr/>
          <p:nvPr/>
        </p:nvSpPr>
        <p:spPr>
{xfrm}          <a:prstGeom prst="{prst}"><a:avLst/></a:prstGeom>
          <a:solidFill><a:srgbClr val="{color}"/></a:solidFill>
          <a:ln><a:noFill/></a:ln>
        </p:spPr>
{body}      </p:sp>
"#,
        xfrm = shape_xfrm(rect),
    )
}

fn picture_shape(id: u32, alt: &str, rect: Rect) -> String {
    format!(
        r#"      <p:pic>
        <p:nvPicPr>
          <p:cNvPr id="{id}" name="Picture {id}" descr="{alt}"/>
          <p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>
          <p:nvPr/>
        </p:nvPicPr>
        <p:blipFill>
          <a:blip r:embed="rId2"/>
          <a:stretch><a:fillRect/></a:stretch>
        </p:blipFill>
        <p:spPr>
{xfrm}          <a:prstGeom prst="rect"><a:avLst/></a:prstGeom>
        </p:spPr>
      </p:pic>
"#,
        alt = escape_xml(alt),
        xfrm = shape_xfrm(rect),
    )
}

fn slide_xml(background: &str, shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{NS_DRAWING}" xmlns:r="{NS_RELATIONSHIPS}" xmlns:p="{NS_PRESENTATION}">
  <p:cSld>
    <p:bg>
      <p:bgPr>
        <a:solidFill><a:srgbClr val="{background}"/></a:solidFill>
        <a:effectLst/>
      </p:bgPr>
    </p:bg>
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
{shapes}    </p:spTree>
  </p:cSld>
  <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sld>"#,
    )
}

fn bullet_lines(layout: LayoutKind, bullets: &[String]) -> Vec<String> {
    match layout.bullet_style() {
        BulletStyle::Numbers => bullets
            .iter()
            .enumerate()
            .map(|(i, b)| format!("{}. {b}", i + 1))
            .collect(),
        BulletStyle::Dots => bullets.iter().map(|b| format!("\u{2022} {b}")).collect(),
    }
}

fn content_slide_xml(slide: &Slide, palette: &Palette, font: &str, has_image: bool) -> String {
    let layout = slide.content.layout();
    let geo = geometry::for_layout(layout);
    let text_hex = palette.text.to_hex();
    let accent_hex = palette.accent.to_hex();
    let centred = layout.centres_text();
    let mut shapes = String::new();
    let mut next_id = 2;

    shapes.push_str(&text_shape(
        next_id,
        "Title",
        geo.title,
        &paragraph(
            slide.content.title(),
            &ParaStyle {
                size: 2800,
                color: &text_hex,
                bold: true,
                centred,
                font,
            },
        ),
    ));
    next_id += 1;

    if let Some(bar) = geo.accent_bar {
        shapes.push_str(&filled_shape(next_id, "Accent Bar", "rect", bar, &accent_hex, ""));
        next_id += 1;
    }

    if has_image {
        if let Some(image_rect) = geo.image {
            let alt = slide
                .content
                .image_slot()
                .and_then(|slot| slot.resolved.as_ref())
                .map_or("", |resolved| resolved.alt.as_str());
            shapes.push_str(&picture_shape(next_id, alt, image_rect));
            next_id += 1;
        }
    }

    match &slide.content {
        SlideContent::GridLayout { items, .. } => {
            let style = ParaStyle {
                size: 1600,
                color: &text_hex,
                bold: false,
                centred: false,
                font,
            };
            let badge_style = ParaStyle {
                size: 1400,
                color: "FFFFFF",
                bold: true,
                centred: true,
                font,
            };
            for (index, (item, rect)) in items
                .iter()
                .take(GRID_ITEM_LIMIT)
                .zip(geometry::grid_boxes())
                .enumerate()
            {
                let badge = Rect {
                    x: rect.x,
                    y: rect.y,
                    cx: geometry::emu(0.4),
                    cy: geometry::emu(0.4),
                };
                shapes.push_str(&filled_shape(
                    next_id,
                    "Item Badge",
                    "ellipse",
                    badge,
                    &accent_hex,
                    &paragraph(&format!("{}", index + 1), &badge_style),
                ));
                next_id += 1;
                let text_rect = Rect {
                    x: rect.x + geometry::emu(0.55),
                    y: rect.y,
                    cx: rect.cx - geometry::emu(0.55),
                    cy: rect.cy,
                };
                shapes.push_str(&text_shape(
                    next_id,
                    "Item Text",
                    text_rect,
                    &paragraph(item, &style),
                ));
                next_id += 1;
            }
        }
        content => {
            let bullets = content.bullets();
            if !bullets.is_empty() {
                let style = ParaStyle {
                    size: 1800,
                    color: &text_hex,
                    bold: false,
                    centred,
                    font,
                };
                let paragraphs: String = bullet_lines(layout, bullets)
                    .iter()
                    .map(|line| paragraph(line, &style))
                    .collect();
                shapes.push_str(&text_shape(next_id, "Body", geo.body, &paragraphs));
                next_id += 1;
            }
        }
    }

    let insight_text = match &slide.content {
        SlideContent::SplitContent { key_insight, .. } => Some(key_insight.as_str()),
        SlideContent::TextOnly {
            key_insight: Some(text),
            ..
        } => Some(text.as_str()),
        _ => None,
    };
    if let Some(text) = insight_text {
        if let Some(panel) = geo.insight {
            let mut paragraphs = paragraph(
                "Key Insight",
                &ParaStyle {
                    size: 1600,
                    color: "FFFFFF",
                    bold: true,
                    centred: false,
                    font,
                },
            );
            paragraphs.push_str(&paragraph(
                text,
                &ParaStyle {
                    size: 1400,
                    color: "FFFFFF",
                    bold: false,
                    centred: false,
                    font,
                },
            ));
            shapes.push_str(&filled_shape(
                next_id,
                "Key Insight",
                "roundRect",
                panel,
                &accent_hex,
                &paragraphs,
            ));
        } else {
            // Text-only slides append the insight under the bullets.
            shapes.push_str(&text_shape(
                next_id,
                "Key Insight",
                Rect {
                    x: geo.body.x,
                    y: geo.body.y + geo.body.cy,
                    cx: geo.body.cx,
                    cy: geometry::emu(0.8),
                },
                &paragraph(
                    text,
                    &ParaStyle {
                        size: 1600,
                        color: &accent_hex,
                        bold: true,
                        centred,
                        font,
                    },
                ),
            ));
        }
    }

    slide_xml(&palette.background.to_hex(), &shapes)
}

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
